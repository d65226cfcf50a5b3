use client::Request;
use payloads::{
    Client, ClientId, PAYMENT_METHODS, ProductId, Purchase, PurchaseDraft,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::{use_fetch, use_products, use_purchases, use_title};
use crate::{Notice, Route, State, get_api_client};

const SELECT_CLASS: &str = "w-full px-3 py-2 border border-neutral-300 dark:border-neutral-600 \
                            rounded-md shadow-sm bg-white dark:bg-neutral-700 \
                            text-neutral-900 dark:text-neutral-100 \
                            focus:outline-none focus:ring-2 focus:ring-neutral-500";

fn empty_draft() -> PurchaseDraft {
    PurchaseDraft::new(ClientId(String::new()), PAYMENT_METHODS[0])
}

#[function_component]
pub fn PurchaseNewPage() -> Html {
    use_title("New purchase");
    let clients_path =
        use_memo((), |_| get_api_client().config.endpoints.clients);
    let clients = use_fetch::<Vec<Client>>(Request::get(&*clients_path));
    let products = use_products();
    let purchases = use_purchases();
    let navigator = use_navigator();
    let dispatch = use_dispatch::<State>();

    let draft = use_state(empty_draft);
    let selected = use_state(|| None::<ProductId>);
    let quantity = use_state(|| 1_i32);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let on_client = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            let mut next = (*draft).clone();
            next.client_id = ClientId(value);
            draft.set(next);
        })
    };

    let on_payment = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            let mut next = (*draft).clone();
            next.payment_method = value;
            draft.set(next);
        })
    };

    let on_product = {
        let selected = selected.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            selected.set(value.parse().ok().map(ProductId));
        })
    };

    let on_quantity = {
        let quantity = quantity.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            quantity.set(value.parse().unwrap_or(0));
        })
    };

    let on_add = {
        let draft = draft.clone();
        let selected = selected.clone();
        let quantity = quantity.clone();
        let shelf = products.state.items.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(product) = (*selected).and_then(|product_id| {
                shelf.iter().find(|product| product.product_id == product_id)
            }) else {
                return;
            };
            let mut next = (*draft).clone();
            next.add_product(product, *quantity);
            draft.set(next);
            selected.set(None);
            quantity.set(1);
        })
    };

    let on_remove = {
        let draft = draft.clone();
        Callback::from(move |product_id: ProductId| {
            let mut next = (*draft).clone();
            next.remove_product(product_id);
            draft.set(next);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        let actions = purchases.actions.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Err(problem) = draft.check() {
                error.set(Some(problem.to_string()));
                return;
            }
            error.set(None);
            submitting.set(true);

            let error = error.clone();
            let submitting = submitting.clone();
            let dispatch = dispatch.clone();
            let navigator = navigator.clone();
            actions.save(
                (*draft).clone(),
                Callback::from(move |result: Result<Purchase, String>| {
                    submitting.set(false);
                    match result {
                        Ok(purchase) => {
                            let id = purchase.purchase_id;
                            dispatch.reduce_mut(|state| {
                                state.notice = Some(Notice::Success(format!(
                                    "Recorded purchase #{id}"
                                )))
                            });
                            if let Some(navigator) = &navigator {
                                navigator.push(&Route::PurchaseDetail { id: id.0 });
                            }
                        }
                        Err(e) => error.set(Some(e)),
                    }
                }),
            );
        })
    };

    let shelf = &products.state.items;
    let product_name = |product_id: ProductId| {
        shelf
            .iter()
            .find(|product| product.product_id == product_id)
            .map(|product| product.name.clone())
            .unwrap_or_else(|| format!("Product #{product_id}"))
    };

    html! {
        <div class="space-y-6">
            <Link<Route> to={Route::Purchases} classes="text-sm text-neutral-600 dark:text-neutral-400 hover:underline">
                {"← All purchases"}
            </Link<Route>>

            <form onsubmit={on_submit} class="bg-white dark:bg-neutral-800 p-6 rounded-lg shadow-md border border-neutral-200 dark:border-neutral-700 space-y-6">
                <h1 class="text-2xl font-bold">{"New purchase"}</h1>

                if let Some(error) = &*error {
                    <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border border-red-200 dark:border-red-800">
                        <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
                    </div>
                }

                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <label class="block text-sm font-medium">
                        {"Client"}
                        {clients.render("clients", |clients| html! {
                            <select onchange={on_client.clone()} class={SELECT_CLASS}>
                                <option value="" selected={draft.client_id.0.is_empty()}>
                                    {"Select a client"}
                                </option>
                                {clients.iter().map(|client| html! {
                                    <option
                                        key={client.client_id.to_string()}
                                        value={client.client_id.to_string()}
                                        selected={client.client_id == draft.client_id}
                                    >
                                        {client.full_name()}
                                    </option>
                                }).collect::<Html>()}
                            </select>
                        })}
                    </label>
                    <label class="block text-sm font-medium">
                        {"Payment method"}
                        <select onchange={on_payment} class={SELECT_CLASS}>
                            {PAYMENT_METHODS.iter().map(|method| html! {
                                <option
                                    key={*method}
                                    value={*method}
                                    selected={draft.payment_method == *method}
                                >
                                    {*method}
                                </option>
                            }).collect::<Html>()}
                        </select>
                    </label>
                </div>

                <div class="space-y-3">
                    <h2 class="text-lg font-semibold">{"Products"}</h2>
                    if products.is_initial_loading() {
                        <p class="text-sm text-neutral-600 dark:text-neutral-400">{"Loading products..."}</p>
                    } else {
                        <div class="grid grid-cols-1 md:grid-cols-3 gap-4 items-end">
                            <label class="block text-sm font-medium">
                                {"Product"}
                                <select onchange={on_product} class={SELECT_CLASS}>
                                    <option value="" selected={selected.is_none()}>
                                        {"Select a product"}
                                    </option>
                                    {shelf.iter().filter(|product| product.active).map(|product| html! {
                                        <option
                                            key={product.product_id.to_string()}
                                            value={product.product_id.to_string()}
                                            selected={*selected == Some(product.product_id)}
                                        >
                                            {format!("{} - {:.2} (stock: {})", product.name, product.price, product.stock)}
                                        </option>
                                    }).collect::<Html>()}
                                </select>
                            </label>
                            <label class="block text-sm font-medium">
                                {"Quantity"}
                                <input
                                    type="number"
                                    min="1"
                                    value={quantity.to_string()}
                                    oninput={on_quantity}
                                    class={SELECT_CLASS}
                                />
                            </label>
                            <button
                                type="button"
                                onclick={on_add}
                                disabled={selected.is_none() || *quantity <= 0}
                                class="py-2 px-4 rounded-md text-sm font-medium bg-neutral-100 hover:bg-neutral-200 dark:bg-neutral-700 dark:hover:bg-neutral-600 disabled:opacity-50"
                            >
                                {"Add"}
                            </button>
                        </div>
                    }

                    <table class="min-w-full divide-y divide-neutral-200 dark:divide-neutral-700 text-sm">
                        <thead>
                            <tr class="text-left text-xs font-medium uppercase text-neutral-500">
                                <th class="px-4 py-2">{"Product"}</th>
                                <th class="px-4 py-2 text-right">{"Quantity"}</th>
                                <th class="px-4 py-2 text-right">{"Total"}</th>
                                <th class="px-4 py-2"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-neutral-200 dark:divide-neutral-700">
                            if draft.items.is_empty() {
                                <tr>
                                    <td colspan="4" class="px-4 py-4 text-center text-neutral-500">
                                        {"No products added yet"}
                                    </td>
                                </tr>
                            } else {
                                {draft.items.iter().map(|item| {
                                    let product_id = item.product_id;
                                    html! {
                                        <tr key={product_id.to_string()}>
                                            <td class="px-4 py-2">{product_name(product_id)}</td>
                                            <td class="px-4 py-2 text-right">{item.quantity.to_string()}</td>
                                            <td class="px-4 py-2 text-right">{format!("{:.2}", item.total)}</td>
                                            <td class="px-4 py-2 text-right">
                                                <button
                                                    type="button"
                                                    onclick={on_remove.reform(move |_: MouseEvent| product_id)}
                                                    class="text-red-600 dark:text-red-400 hover:underline"
                                                >
                                                    {"Remove"}
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }).collect::<Html>()}
                                <tr class="font-semibold">
                                    <td class="px-4 py-2" colspan="2">{"Total"}</td>
                                    <td class="px-4 py-2 text-right">{format!("{:.2}", draft.total())}</td>
                                    <td></td>
                                </tr>
                            }
                        </tbody>
                    </table>
                </div>

                <div class="flex justify-end space-x-3">
                    <Link<Route>
                        to={Route::Purchases}
                        classes="py-2 px-4 border border-neutral-300 dark:border-neutral-600 rounded-md text-sm font-medium"
                    >
                        {"Cancel"}
                    </Link<Route>>
                    <button
                        type="submit"
                        disabled={*submitting}
                        class="py-2 px-4 rounded-md text-sm font-medium text-white bg-neutral-900 hover:bg-neutral-800 dark:bg-neutral-100 dark:text-neutral-900 disabled:opacity-50"
                    >
                        {if *submitting { "Saving..." } else { "Save purchase" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
