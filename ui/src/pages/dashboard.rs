use yew::prelude::*;

use crate::Route;
use crate::components::StatCard;
use crate::hooks::{use_dashboard, use_title};

#[function_component]
pub fn DashboardPage() -> Html {
    use_title("Dashboard");
    let dashboard = use_dashboard();

    let on_refresh = {
        let refetch = dashboard.refetch.clone();
        Callback::from(move |_| refetch.emit(()))
    };

    html! {
        <div class="space-y-8">
            <div class="flex justify-between items-center">
                <div>
                    <h1 class="text-3xl font-bold text-neutral-900 dark:text-neutral-100">
                        {"Dashboard"}
                    </h1>
                    <p class="text-lg text-neutral-600 dark:text-neutral-400 mt-2">
                        {"Catalog and sales at a glance"}
                    </p>
                </div>
                <button
                    onclick={on_refresh}
                    disabled={dashboard.is_loading}
                    class="bg-neutral-900 hover:bg-neutral-800 dark:bg-neutral-100 dark:text-neutral-900 dark:hover:bg-neutral-200 text-white px-4 py-2 rounded-md text-sm font-medium transition-colors disabled:opacity-50"
                >
                    {"Refresh"}
                </button>
            </div>

            if let Some(error) = &dashboard.error {
                <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                </div>
            }

            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <StatCard
                    title="Products"
                    value={dashboard.product_count}
                    to={Route::Products}
                    link_label="Manage products"
                />
                <StatCard
                    title="Purchases"
                    value={dashboard.purchase_count}
                    to={Route::Purchases}
                    link_label="View purchases"
                />
            </div>
        </div>
    }
}
