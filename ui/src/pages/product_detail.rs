use client::{Request, config::fill};
use payloads::{Product, ProductId};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::{use_fetch, use_title};
use crate::{Route, get_api_client};

#[derive(Properties, PartialEq)]
pub struct ProductDetailProps {
    pub product_id: ProductId,
}

#[function_component]
pub fn ProductDetailPage(props: &ProductDetailProps) -> Html {
    use_title(&format!("Product #{}", props.product_id));
    let template =
        use_memo((), |_| get_api_client().config.endpoints.products.get);
    let product =
        use_fetch::<Product>(Request::get(fill(&template, props.product_id)));

    html! {
        <div class="space-y-6">
            <Link<Route> to={Route::Products} classes="text-sm text-neutral-600 dark:text-neutral-400 hover:underline">
                {"← All products"}
            </Link<Route>>
            {product.render("product", |product| html! {
                <div class="bg-white dark:bg-neutral-800 p-6 rounded-lg shadow-md border border-neutral-200 dark:border-neutral-700 space-y-6">
                    <h1 class="text-2xl font-bold">{&product.name}</h1>
                    <dl class="grid grid-cols-1 md:grid-cols-2 gap-4 text-sm">
                        <div>
                            <dt class="text-neutral-500">{"Barcode"}</dt>
                            <dd>{product.barcode.clone().unwrap_or_else(|| "None".into())}</dd>
                        </div>
                        <div>
                            <dt class="text-neutral-500">{"Category"}</dt>
                            <dd>
                                {product.category.as_ref()
                                    .map(|category| category.category.clone())
                                    .unwrap_or_else(|| "Not specified".into())}
                            </dd>
                        </div>
                        <div>
                            <dt class="text-neutral-500">{"Price"}</dt>
                            <dd class="font-semibold">{format!("{:.2}", product.price)}</dd>
                        </div>
                        <div>
                            <dt class="text-neutral-500">{"Stock"}</dt>
                            <dd>{format!("{} units", product.stock)}</dd>
                        </div>
                        <div>
                            <dt class="text-neutral-500">{"Status"}</dt>
                            <dd class={if product.active { "text-green-600" } else { "text-red-600" }}>
                                {if product.active { "Active" } else { "Inactive" }}
                            </dd>
                        </div>
                    </dl>
                </div>
            })}
        </div>
    }
}
