use client::{APIClient, ClientConfig};
use payloads::{ProductId, PurchaseId};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

mod components;
mod hooks;
mod logs;
mod pages;
mod storage;

use components::layout::MainLayout;
use pages::{
    DashboardPage, NotFoundPage, ProductDetailPage, ProductsPage,
    PurchaseDetailPage, PurchaseNewPage, PurchasesPage,
};

/// App-wide notices, e.g. the outcome of the last save or delete.
#[derive(Default, Clone, PartialEq, Store)]
pub struct State {
    pub notice: Option<Notice>,
}

#[derive(Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

// Global API client - configurable via environment or same-origin fallback
pub fn get_api_client() -> APIClient {
    // Try environment variable first (set at build time)
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .unwrap_or_else(|| {
            // Fallback to same origin
            web_sys::window()
                .and_then(|window| window.location().origin().ok())
                .unwrap_or_else(|| client::config::DEFAULT_BASE_URL.to_string())
        });

    APIClient::new(ClientConfig::new(address))
}

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <BrowserRouter>
            <MainLayout>
                <Switch<Route> render={switch} />
            </MainLayout>
        </BrowserRouter>
    }
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/products")]
    Products,
    #[at("/products/:id")]
    ProductDetail { id: i64 },
    #[at("/purchases")]
    Purchases,
    #[at("/purchases/new")]
    PurchaseNew,
    #[at("/purchases/:id")]
    PurchaseDetail { id: i64 },
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::Products => html! { <ProductsPage /> },
        Route::ProductDetail { id } => {
            html! { <ProductDetailPage product_id={ProductId(id)} /> }
        }
        Route::Purchases => html! { <PurchasesPage /> },
        Route::PurchaseNew => html! { <PurchaseNewPage /> },
        Route::PurchaseDetail { id } => {
            html! { <PurchaseDetailPage purchase_id={PurchaseId(id)} /> }
        }
        Route::NotFound => html! { <NotFoundPage /> },
    }
}
