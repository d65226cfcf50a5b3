use std::str::FromStr;

use payloads::{Product, ProductDraft, ProductId};
use rust_decimal::Decimal;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::{use_products, use_title};
use crate::{Notice, Route, State};

/// What the form is editing, if it is open.
#[derive(Clone, PartialEq)]
enum Editing {
    New,
    Existing(Product),
}

#[function_component]
pub fn ProductsPage() -> Html {
    use_title("Products");
    let products = use_products();
    let dispatch = use_dispatch::<State>();
    let editing = use_state(|| None::<Editing>);
    let confirming_delete = use_state(|| None::<ProductId>);
    let saving = use_state(|| false);

    let on_new = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(Some(Editing::New)))
    };

    let on_cancel = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(None))
    };

    let on_submit = {
        let editing = editing.clone();
        let saving = saving.clone();
        let dispatch = dispatch.clone();
        let actions = products.actions.clone();
        Callback::from(move |draft: ProductDraft| {
            let name = draft.name.clone();
            let editing = editing.clone();
            let saving = saving.clone();
            let dispatch = dispatch.clone();
            saving.set(true);
            actions.save(
                draft,
                Callback::from(move |result: Result<Product, String>| {
                    saving.set(false);
                    match result {
                        Ok(_) => {
                            editing.set(None);
                            dispatch.reduce_mut(|state| {
                                state.notice =
                                    Some(Notice::Success(format!("Saved {name}")))
                            });
                        }
                        Err(e) => dispatch.reduce_mut(|state| {
                            state.notice = Some(Notice::Error(e))
                        }),
                    }
                }),
            );
        })
    };

    let on_delete = {
        let confirming_delete = confirming_delete.clone();
        let dispatch = dispatch.clone();
        let actions = products.actions.clone();
        Callback::from(move |product_id: ProductId| {
            // first click asks, second click deletes
            if *confirming_delete != Some(product_id) {
                confirming_delete.set(Some(product_id));
                return;
            }
            confirming_delete.set(None);
            let dispatch = dispatch.clone();
            actions.delete(
                product_id,
                Callback::from(move |result: Result<(), String>| {
                    let notice = match result {
                        Ok(()) => Notice::Success(format!(
                            "Deleted product #{product_id}"
                        )),
                        Err(e) => Notice::Error(e),
                    };
                    dispatch.reduce_mut(|state| state.notice = Some(notice));
                }),
            );
        })
    };

    let state = &products.state;

    html! {
        <div class="space-y-8">
            <div class="flex justify-between items-center">
                <div>
                    <h1 class="text-3xl font-bold text-neutral-900 dark:text-neutral-100">
                        {"Products"}
                    </h1>
                    <p class="text-lg text-neutral-600 dark:text-neutral-400 mt-2">
                        {"Prices, stock and availability"}
                        if state.loading {
                            <span class="ml-2 text-sm">{"Refreshing..."}</span>
                        }
                    </p>
                </div>
                <button
                    onclick={on_new}
                    class="bg-neutral-900 hover:bg-neutral-800 dark:bg-neutral-100 dark:text-neutral-900 dark:hover:bg-neutral-200 text-white px-4 py-2 rounded-md text-sm font-medium transition-colors"
                >
                    {"New Product"}
                </button>
            </div>

            if let Some(editing) = &*editing {
                <ProductForm
                    key={match editing {
                        Editing::New => "new".to_string(),
                        Editing::Existing(product) => product.product_id.to_string(),
                    }}
                    initial={match editing {
                        Editing::New => None,
                        Editing::Existing(product) => Some(product.clone()),
                    }}
                    saving={*saving}
                    on_submit={on_submit}
                    on_cancel={on_cancel}
                />
            }

            if let Some(error) = &state.error {
                <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                </div>
            }

            if state.from_cache {
                <p class="text-xs text-neutral-500">{"Showing saved data while the catalog loads."}</p>
            }

            if products.is_initial_loading() {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">{"Loading products..."}</p>
                </div>
            } else if state.items.is_empty() {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">{"No products yet."}</p>
                </div>
            } else {
                <table class="min-w-full divide-y divide-neutral-200 dark:divide-neutral-700">
                    <thead>
                        <tr class="text-left text-xs font-medium uppercase text-neutral-500">
                            <th class="px-4 py-2">{"Name"}</th>
                            <th class="px-4 py-2">{"Category"}</th>
                            <th class="px-4 py-2">{"Barcode"}</th>
                            <th class="px-4 py-2 text-right">{"Price"}</th>
                            <th class="px-4 py-2 text-right">{"Stock"}</th>
                            <th class="px-4 py-2">{"Active"}</th>
                            <th class="px-4 py-2"></th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-neutral-200 dark:divide-neutral-700">
                        {state.items.iter().map(|product| {
                            let product_id = product.product_id;
                            let on_edit = {
                                let editing = editing.clone();
                                let product = product.clone();
                                Callback::from(move |_| {
                                    editing.set(Some(Editing::Existing(product.clone())))
                                })
                            };
                            let on_delete = on_delete.reform(move |_: MouseEvent| product_id);
                            let confirming = *confirming_delete == Some(product_id);
                            html! {
                                <tr key={product_id.to_string()} class="text-sm">
                                    <td class="px-4 py-2 font-medium">
                                        <Link<Route> to={Route::ProductDetail { id: product_id.0 }} classes="hover:underline">
                                            {&product.name}
                                        </Link<Route>>
                                    </td>
                                    <td class="px-4 py-2">
                                        {product.category.as_ref().map(|c| c.category.clone()).unwrap_or_default()}
                                    </td>
                                    <td class="px-4 py-2">{product.barcode.clone().unwrap_or_default()}</td>
                                    <td class="px-4 py-2 text-right">{format!("{:.2}", product.price)}</td>
                                    <td class="px-4 py-2 text-right">{product.stock.to_string()}</td>
                                    <td class="px-4 py-2">{if product.active { "Yes" } else { "No" }}</td>
                                    <td class="px-4 py-2 space-x-2 text-right">
                                        <button onclick={on_edit} class="text-neutral-700 dark:text-neutral-300 hover:underline">
                                            {"Edit"}
                                        </button>
                                        <button onclick={on_delete} class="text-red-600 dark:text-red-400 hover:underline">
                                            {if confirming { "Confirm delete" } else { "Delete" }}
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect::<Html>()}
                    </tbody>
                </table>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ProductFormProps {
    initial: Option<Product>,
    saving: bool,
    on_submit: Callback<ProductDraft>,
    on_cancel: Callback<()>,
}

#[function_component]
fn ProductForm(props: &ProductFormProps) -> Html {
    let name_ref = use_node_ref();
    let barcode_ref = use_node_ref();
    let price_ref = use_node_ref();
    let stock_ref = use_node_ref();
    let active_ref = use_node_ref();
    let error_message = use_state(|| None::<String>);

    let initial = props.initial.clone();
    let on_submit = {
        let refs = (
            name_ref.clone(),
            barcode_ref.clone(),
            price_ref.clone(),
            stock_ref.clone(),
            active_ref.clone(),
        );
        let error_message = error_message.clone();
        let on_submit = props.on_submit.clone();
        let initial = initial.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (name, barcode, price, stock, active) = &refs;
            let value = |node: &NodeRef| {
                node.cast::<HtmlInputElement>()
                    .map(|input| input.value().trim().to_string())
                    .unwrap_or_default()
            };

            let name = value(name);
            if name.is_empty() {
                error_message.set(Some("Please enter a product name".into()));
                return;
            }
            let Ok(price) = Decimal::from_str(&value(price)) else {
                error_message.set(Some("Please enter a valid price".into()));
                return;
            };
            let Ok(stock) = value(stock).parse::<i32>() else {
                error_message.set(Some("Please enter a whole number of units".into()));
                return;
            };
            let barcode = Some(value(barcode)).filter(|barcode| !barcode.is_empty());
            let active = active
                .cast::<HtmlInputElement>()
                .map(|input| input.checked())
                .unwrap_or(true);

            error_message.set(None);
            let draft = match &initial {
                Some(product) => ProductDraft {
                    name,
                    barcode,
                    price,
                    stock,
                    active,
                    ..ProductDraft::from(product.clone())
                },
                None => ProductDraft {
                    barcode,
                    active,
                    ..ProductDraft::new(name, price, stock)
                },
            };
            on_submit.emit(draft);
        })
    };

    let on_cancel = props.on_cancel.reform(|_: MouseEvent| ());
    let input_class = "w-full px-3 py-2 border border-neutral-300 dark:border-neutral-600 \
                       rounded-md shadow-sm bg-white dark:bg-neutral-700 \
                       text-neutral-900 dark:text-neutral-100 \
                       focus:outline-none focus:ring-2 focus:ring-neutral-500";

    html! {
        <form onsubmit={on_submit} class="bg-white dark:bg-neutral-800 p-6 rounded-lg shadow-md border border-neutral-200 dark:border-neutral-700 space-y-4">
            <h2 class="text-xl font-semibold">
                {if initial.is_some() { "Edit product" } else { "New product" }}
            </h2>

            if let Some(error) = &*error_message {
                <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                </div>
            }

            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <label class="block text-sm font-medium">
                    {"Name"}
                    <input ref={name_ref} type="text" required={true} class={input_class}
                        value={initial.as_ref().map(|p| p.name.clone()).unwrap_or_default()} />
                </label>
                <label class="block text-sm font-medium">
                    {"Barcode"}
                    <input ref={barcode_ref} type="text" class={input_class}
                        value={initial.as_ref().and_then(|p| p.barcode.clone()).unwrap_or_default()} />
                </label>
                <label class="block text-sm font-medium">
                    {"Price"}
                    <input ref={price_ref} type="text" inputmode="decimal" required={true} class={input_class}
                        value={initial.as_ref().map(|p| p.price.to_string()).unwrap_or_default()} />
                </label>
                <label class="block text-sm font-medium">
                    {"Stock"}
                    <input ref={stock_ref} type="number" min="0" required={true} class={input_class}
                        value={initial.as_ref().map(|p| p.stock.to_string()).unwrap_or_default()} />
                </label>
            </div>
            <label class="flex items-center space-x-2 text-sm">
                <input ref={active_ref} type="checkbox"
                    checked={initial.as_ref().map(|p| p.active).unwrap_or(true)} />
                <span>{"Available for sale"}</span>
            </label>

            <div class="flex space-x-3">
                <button
                    type="button"
                    onclick={on_cancel}
                    disabled={props.saving}
                    class="flex-1 py-2 px-4 border border-neutral-300 dark:border-neutral-600 rounded-md text-sm font-medium disabled:opacity-50"
                >
                    {"Cancel"}
                </button>
                <button
                    type="submit"
                    disabled={props.saving}
                    class="flex-1 py-2 px-4 rounded-md text-sm font-medium text-white bg-neutral-900 hover:bg-neutral-800 dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                >
                    {if props.saving { "Saving..." } else { "Save" }}
                </button>
            </div>
        </form>
    }
}
