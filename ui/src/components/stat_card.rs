use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: AttrValue,
    /// None while loading.
    pub value: Option<usize>,
    pub to: Route,
    pub link_label: AttrValue,
}

#[function_component]
pub fn StatCard(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-white dark:bg-neutral-800 p-6 rounded-lg shadow-md border border-neutral-200 dark:border-neutral-700 space-y-4">
            <h3 class="text-sm font-medium text-neutral-600 dark:text-neutral-400">
                {&props.title}
            </h3>
            <p class="text-3xl font-bold text-neutral-900 dark:text-neutral-100">
                {match props.value {
                    Some(value) => value.to_string(),
                    None => "…".to_string(),
                }}
            </p>
            <Link<Route>
                to={props.to.clone()}
                classes="block w-full bg-neutral-100 hover:bg-neutral-200 dark:bg-neutral-700 dark:hover:bg-neutral-600 text-neutral-900 dark:text-neutral-100 px-4 py-2 rounded-md text-sm font-medium transition-colors text-center"
            >
                {&props.link_label}
            </Link<Route>>
        </div>
    }
}
