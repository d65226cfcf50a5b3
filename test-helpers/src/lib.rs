pub mod backend;
pub mod mock;
pub mod routes;
pub mod server;
pub mod store;
pub mod telemetry;

use std::time::Duration;

use actix_web::web;
use client::{APIClient, ClientConfig, ClientError, Request};
use jiff::civil::DateTime;
use payloads::{
    Category, CategoryId, Client, ClientId, Product, ProductDraft, Purchase,
    PurchaseDraft, PurchaseItemDraft, PurchaseStatus,
};
use reqwest::StatusCode;
use rust_decimal::dec;

use crate::backend::{MockBackend, RecordedRequest};
use crate::routes::API_PREFIX;
use crate::server::Config;

pub struct TestApp {
    pub port: u16,
    pub client: APIClient,
    pub backend: web::Data<MockBackend>,
}

impl TestApp {
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}{API_PREFIX}", self.port)
    }

    /// A separate client against this app, with its own cookie jar.
    pub fn client_with(
        &self,
        configure: impl FnOnce(ClientConfig) -> ClientConfig,
    ) -> APIClient {
        APIClient::new(configure(ClientConfig::new(self.base_url())))
    }

    /// Answer requests to `path` (relative to the API root) with a canned
    /// response.
    pub fn stub(&self, path: &str, status: u16, body: &str) {
        self.backend.stub(&format!("{API_PREFIX}{path}"), status, body);
    }

    pub fn clear_stub(&self, path: &str) {
        self.backend.clear_stub(&format!("{API_PREFIX}{path}"));
    }

    pub fn set_delay(&self, path: &str, delay: Duration) {
        self.backend.set_delay(&format!("{API_PREFIX}{path}"), delay);
    }

    pub fn clear_delay(&self, path: &str) {
        self.backend.clear_delay(&format!("{API_PREFIX}{path}"));
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.backend.requests_to(&format!("{API_PREFIX}{path}"))
    }
}

/// Functions to populate test data
///
/// Using anyhow::Result lets us get a backtrace from when the error was fist
/// converted to anyhow::Result. Run with RUST_BACKTRACE=1 to view.
impl TestApp {
    /// Categories and clients have no write routes, so they go straight into
    /// the store.
    pub fn seed_catalog(&self) {
        let mut store = self.backend.store();
        store.add_category(dairy_category());
        store.add_category(bakery_category());
        store.add_client(test_client());
    }

    pub async fn create_milk(&self) -> anyhow::Result<Product> {
        Ok(self.client.save_product(&milk_draft()).await?)
    }

    pub async fn create_bread(&self) -> anyhow::Result<Product> {
        Ok(self.client.save_product(&bread_draft()).await?)
    }

    /// A purchase of two units of `product` by the test client.
    pub async fn create_purchase_of(
        &self,
        product: &Product,
    ) -> anyhow::Result<Purchase> {
        let draft = purchase_draft(&test_client().client_id, product, 2);
        Ok(self.client.create_purchase(&draft).await?)
    }

    /// Ask the backend for a session cookie.
    pub async fn open_session(&self, client: &APIClient) -> anyhow::Result<()> {
        client.request_empty(&Request::post("/session")).await?;
        Ok(())
    }
}

pub fn dairy_category() -> Category {
    Category {
        category_id: CategoryId(1),
        category: "Dairy".into(),
        active: true,
    }
}

pub fn bakery_category() -> Category {
    Category {
        category_id: CategoryId(2),
        category: "Bakery".into(),
        active: true,
    }
}

pub fn test_client() -> Client {
    Client {
        client_id: ClientId("4546221".into()),
        first_name: "Sam".into(),
        last_name: "Rivera".into(),
        phone: Some("3001234567".into()),
        address: None,
        email: Some("sam@example.com".into()),
    }
}

pub fn milk_draft() -> ProductDraft {
    ProductDraft {
        category_id: Some(dairy_category().category_id),
        barcode: Some("7701234000011".into()),
        ..ProductDraft::new("Milk", dec!(2.5), 40)
    }
}

pub fn bread_draft() -> ProductDraft {
    ProductDraft {
        category_id: Some(bakery_category().category_id),
        ..ProductDraft::new("Bread", dec!(1.2), 15)
    }
}

pub fn purchase_draft(
    client_id: &ClientId,
    product: &Product,
    quantity: i32,
) -> PurchaseDraft {
    PurchaseDraft {
        purchase_id: None,
        client_id: client_id.clone(),
        date: Some(DateTime::constant(2025, 3, 1, 10, 30, 0, 0)),
        payment_method: "CASH".into(),
        comment: None,
        status: PurchaseStatus::Completed,
        items: vec![PurchaseItemDraft {
            product_id: product.product_id,
            quantity,
            total: product.price * rust_decimal::Decimal::from(quantity),
        }],
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    telemetry::init_test_subscriber();
    let config = Config {
        ip: "127.0.0.1".into(),
        port,
        allowed_origins: vec!["*".to_string()],
    };
    spawn_app_with(config).await
}

/// Start the mock API in the background with an empty store.
pub async fn spawn_app_with(mut config: Config) -> TestApp {
    let backend = web::Data::new(MockBackend::default());
    let server = server::build(&mut config, backend.clone()).unwrap();
    tokio::spawn(server);

    let client = APIClient::new(ClientConfig::new(format!(
        "http://127.0.0.1:{}{API_PREFIX}",
        config.port
    )));

    TestApp {
        port: config.port,
        client,
        backend,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}
