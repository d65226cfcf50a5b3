use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component]
pub fn Header() -> Html {
    let route = use_route::<Route>();

    let link = |to: Route, label: &'static str| {
        let active = match (&route, &to) {
            (
                Some(Route::PurchaseDetail { .. } | Route::PurchaseNew),
                Route::Purchases,
            ) => true,
            (Some(Route::ProductDetail { .. }), Route::Products) => true,
            (Some(current), to) => current == to,
            (None, _) => false,
        };
        let classes = if active {
            "px-3 py-2 rounded-md text-sm font-medium bg-neutral-100 dark:bg-neutral-700 text-neutral-900 dark:text-white"
        } else {
            "px-3 py-2 rounded-md text-sm font-medium text-neutral-600 dark:text-neutral-300 hover:text-neutral-900 dark:hover:text-white"
        };
        html! {
            <Link<Route> {to} classes={classes}>{label}</Link<Route>>
        }
    };

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex-shrink-0">
                        <h1 class="text-xl font-semibold text-neutral-900 dark:text-white">{"Market"}</h1>
                    </div>
                    <nav class="flex items-center space-x-2">
                        {link(Route::Dashboard, "Dashboard")}
                        {link(Route::Products, "Products")}
                        {link(Route::Purchases, "Purchases")}
                    </nav>
                </div>
            </div>
        </header>
    }
}
