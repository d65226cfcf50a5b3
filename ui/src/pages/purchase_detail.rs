use client::{Request, config::fill};
use payloads::{Purchase, PurchaseId};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::StatusBadge;
use crate::hooks::{use_fetch, use_title};
use crate::{Route, get_api_client};

#[derive(Properties, PartialEq)]
pub struct PurchaseDetailProps {
    pub purchase_id: PurchaseId,
}

#[function_component]
pub fn PurchaseDetailPage(props: &PurchaseDetailProps) -> Html {
    use_title(&format!("Purchase #{}", props.purchase_id));
    let template = use_memo((), |_| get_api_client().config.endpoints.purchases.get);
    let purchase =
        use_fetch::<Purchase>(Request::get(fill(&template, props.purchase_id)));

    html! {
        <div class="space-y-6">
            <Link<Route> to={Route::Purchases} classes="text-sm text-neutral-600 dark:text-neutral-400 hover:underline">
                {"← All purchases"}
            </Link<Route>>
            {purchase.render("purchase", |purchase| html! {
                <PurchaseDetails purchase={purchase.clone()} />
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PurchaseDetailsProps {
    purchase: Purchase,
}

#[function_component]
fn PurchaseDetails(props: &PurchaseDetailsProps) -> Html {
    let purchase = &props.purchase;
    html! {
        <div class="bg-white dark:bg-neutral-800 p-6 rounded-lg shadow-md border border-neutral-200 dark:border-neutral-700 space-y-6">
            <div class="flex justify-between items-start">
                <div>
                    <h1 class="text-2xl font-bold">{format!("Purchase #{}", purchase.purchase_id)}</h1>
                    <p class="text-sm text-neutral-600 dark:text-neutral-400">
                        {purchase.date.strftime("%B %d, %Y %H:%M").to_string()}
                    </p>
                </div>
                <StatusBadge status={purchase.status} />
            </div>

            <dl class="grid grid-cols-1 md:grid-cols-3 gap-4 text-sm">
                <div>
                    <dt class="text-neutral-500">{"Client"}</dt>
                    <dd>{purchase.client_label()}</dd>
                </div>
                <div>
                    <dt class="text-neutral-500">{"Payment method"}</dt>
                    <dd>{&purchase.payment_method}</dd>
                </div>
                if let Some(comment) = &purchase.comment {
                    <div>
                        <dt class="text-neutral-500">{"Comment"}</dt>
                        <dd>{comment}</dd>
                    </div>
                }
            </dl>

            <table class="min-w-full divide-y divide-neutral-200 dark:divide-neutral-700 text-sm">
                <thead>
                    <tr class="text-left text-xs font-medium uppercase text-neutral-500">
                        <th class="px-4 py-2">{"Product"}</th>
                        <th class="px-4 py-2 text-right">{"Quantity"}</th>
                        <th class="px-4 py-2 text-right">{"Total"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-neutral-200 dark:divide-neutral-700">
                    {purchase.items.iter().map(|item| html! {
                        <tr key={item.product_id.to_string()}>
                            <td class="px-4 py-2">
                                {match &item.product {
                                    Some(product) => product.name.clone(),
                                    None => format!("Product #{}", item.product_id),
                                }}
                            </td>
                            <td class="px-4 py-2 text-right">{item.quantity.to_string()}</td>
                            <td class="px-4 py-2 text-right">{format!("{:.2}", item.total)}</td>
                        </tr>
                    }).collect::<Html>()}
                </tbody>
                <tfoot>
                    <tr class="font-semibold">
                        <td class="px-4 py-2" colspan="2">{"Total"}</td>
                        <td class="px-4 py-2 text-right">{format!("{:.2}", purchase.total())}</td>
                    </tr>
                </tfoot>
            </table>
        </div>
    }
}
