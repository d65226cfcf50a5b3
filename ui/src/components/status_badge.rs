use payloads::PurchaseStatus;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub status: PurchaseStatus,
}

#[function_component]
pub fn StatusBadge(props: &StatusBadgeProps) -> Html {
    let colors = match props.status {
        PurchaseStatus::Pending => {
            "bg-yellow-100 text-yellow-800 dark:bg-yellow-900/30 dark:text-yellow-300"
        }
        PurchaseStatus::Completed => {
            "bg-green-100 text-green-800 dark:bg-green-900/30 dark:text-green-300"
        }
        PurchaseStatus::Cancelled => {
            "bg-red-100 text-red-800 dark:bg-red-900/30 dark:text-red-300"
        }
    };
    html! {
        <span class={classes!("inline-flex", "px-2", "py-1", "rounded-full", "text-xs", "font-medium", colors)}>
            {props.status.label()}
        </span>
    }
}
