use yew::prelude::*;
use yewdux::prelude::*;

use crate::{Notice, State};

/// Shows the last notice until dismissed.
#[function_component]
pub fn NoticeBanner() -> Html {
    let (state, dispatch) = use_store::<State>();
    let Some(notice) = &state.notice else {
        return html! {};
    };

    let (classes, message) = match notice {
        Notice::Success(message) => (
            "bg-green-50 dark:bg-green-900 border-green-200 dark:border-green-800 text-green-700 dark:text-green-400",
            message,
        ),
        Notice::Error(message) => (
            "bg-red-50 dark:bg-red-900/20 border-red-200 dark:border-red-800 text-red-700 dark:text-red-400",
            message,
        ),
    };
    let on_close = dispatch.reduce_mut_callback(|state| state.notice = None);

    html! {
        <div class={classes!("flex", "justify-between", "items-start", "p-4", "rounded-md", "border", classes)}>
            <p class="text-sm font-medium">{message}</p>
            <button
                onclick={on_close}
                class="ml-4 text-lg leading-none opacity-60 hover:opacity-100"
                title="Dismiss"
            >
                {"×"}
            </button>
        </div>
    }
}
