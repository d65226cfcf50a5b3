use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::StatusBadge;
use crate::hooks::{use_purchases, use_title};

#[function_component]
pub fn PurchasesPage() -> Html {
    use_title("Purchases");
    let purchases = use_purchases();
    let state = &purchases.state;

    let on_refresh = {
        let actions = purchases.actions.clone();
        Callback::from(move |_| actions.refetch())
    };

    html! {
        <div class="space-y-8">
            <div class="flex justify-between items-center">
                <div>
                    <h1 class="text-3xl font-bold text-neutral-900 dark:text-neutral-100">
                        {"Purchases"}
                    </h1>
                    <p class="text-lg text-neutral-600 dark:text-neutral-400 mt-2">
                        {"Every sale, newest last"}
                    </p>
                </div>
                <div class="flex space-x-3">
                    <Link<Route>
                        to={Route::PurchaseNew}
                        classes="bg-neutral-900 hover:bg-neutral-800 dark:bg-neutral-100 dark:text-neutral-900 dark:hover:bg-neutral-200 text-white px-4 py-2 rounded-md text-sm font-medium transition-colors"
                    >
                        {"New Purchase"}
                    </Link<Route>>
                    <button
                        onclick={on_refresh}
                        disabled={state.loading}
                        class="bg-neutral-100 hover:bg-neutral-200 dark:bg-neutral-700 dark:hover:bg-neutral-600 text-neutral-900 dark:text-neutral-100 px-4 py-2 rounded-md text-sm font-medium transition-colors disabled:opacity-50"
                    >
                        if state.loading { {"Refreshing..."} } else { {"Refresh"} }
                    </button>
                </div>
            </div>

            if let Some(error) = &state.error {
                <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                </div>
            }

            if purchases.is_initial_loading() {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">{"Loading purchases..."}</p>
                </div>
            } else if state.items.is_empty() {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">{"No purchases yet."}</p>
                </div>
            } else {
                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                    {state.items.iter().map(|purchase| html! {
                        <div key={purchase.purchase_id.to_string()} class="bg-white dark:bg-neutral-800 p-6 rounded-lg shadow-md border border-neutral-200 dark:border-neutral-700 space-y-3">
                            <div class="flex justify-between items-start">
                                <h3 class="text-lg font-semibold">
                                    {format!("Purchase #{}", purchase.purchase_id)}
                                </h3>
                                <StatusBadge status={purchase.status} />
                            </div>
                            <div class="text-sm text-neutral-600 dark:text-neutral-400 space-y-1">
                                <p>{"Client: "}{purchase.client_label()}</p>
                                <p>{"Date: "}{purchase.date.strftime("%B %d, %Y %H:%M").to_string()}</p>
                                <p>{"Payment: "}{&purchase.payment_method}</p>
                                <p class="font-medium text-neutral-900 dark:text-neutral-100">
                                    {format!("Total: {:.2}", purchase.total())}
                                </p>
                            </div>
                            <Link<Route>
                                to={Route::PurchaseDetail { id: purchase.purchase_id.0 }}
                                classes="block w-full bg-neutral-100 hover:bg-neutral-200 dark:bg-neutral-700 dark:hover:bg-neutral-600 text-neutral-900 dark:text-neutral-100 px-4 py-2 rounded-md text-sm font-medium transition-colors text-center"
                            >
                                {"View Details"}
                            </Link<Route>>
                        </div>
                    }).collect::<Html>()}
                </div>
            }
        </div>
    }
}
