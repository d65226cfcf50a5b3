use std::collections::BTreeMap;
use std::time::Duration;

use payloads::{
    CategoryId, Client, ClientId, Product, ProductDraft, ProductId,
    Purchase, PurchaseDraft, PurchaseId,
};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::{ClientConfig, fill};
use crate::request::{Request, build_url};
use crate::time::deadline;

/// An API client for interfacing with the market backend.
///
/// Cloning is cheap and clones share the connection pool and cookies.
#[derive(Clone)]
pub struct APIClient {
    pub config: ClientConfig,
    pub inner_client: reqwest::Client,
}

impl APIClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            inner_client: default_inner_client(),
        }
    }
}

/// Session cookies are kept between requests, like a browser does with
/// credentials included.
#[cfg(not(target_arch = "wasm32"))]
fn default_inner_client() -> reqwest::Client {
    match reqwest::Client::builder().cookie_store(true).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Falling back to a client without cookies: {e}");
            reqwest::Client::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn default_inner_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Helper methods for http actions
impl APIClient {
    fn prepare(
        &self,
        request: &Request,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let url =
            build_url(&self.config.base_url, &request.path, &request.params)?;
        let headers =
            merge_headers(&self.config.default_headers, &request.headers)?;

        let mut builder = self
            .inner_client
            .request(request.method.into(), url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone().into_string());
        }

        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();

        Ok(builder)
    }

    /// Perform the exchange, racing it against cancellation and the timeout.
    async fn send(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<(StatusCode, String), ClientError> {
        let builder = self.prepare(request)?;
        tracing::debug!(method = ?request.method, path = %request.path, "sending request");

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, ClientError>((status, text))
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            elapsed = deadline(self.config.timeout) => {
                Err(ClientError::Timeout(elapsed))
            }
            result = exchange => result,
        };

        // A response that arrived after the caller gave up is not delivered.
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        match &outcome {
            Ok((status, _)) => {
                tracing::debug!(path = %request.path, %status, "response received")
            }
            Err(e) => {
                tracing::warn!(path = %request.path, "request failed: {e}")
            }
        }
        outcome
    }

    /// Send a request and parse the JSON body of a successful response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<T, ClientError> {
        self.request_with_cancel(request, &CancellationToken::new())
            .await
    }

    pub async fn request_with_cancel<T: DeserializeOwned>(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<T, ClientError> {
        let (status, body) = self.send(request, cancel).await?;
        ok_body(status, &body)
    }

    /// Send a request whose successful response body is not needed.
    pub async fn request_empty(
        &self,
        request: &Request,
    ) -> Result<(), ClientError> {
        self.request_empty_with_cancel(request, &CancellationToken::new())
            .await
    }

    pub async fn request_empty_with_cancel(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let (status, body) = self.send(request, cancel).await?;
        ok_empty(status, &body)
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn list_clients(&self) -> Result<Vec<Client>, ClientError> {
        let request = Request::get(&self.config.endpoints.clients);
        self.request(&request).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let request = Request::get(&self.config.endpoints.products.list);
        self.request(&request).await
    }

    pub async fn get_product(
        &self,
        product_id: ProductId,
    ) -> Result<Product, ClientError> {
        let path = fill(&self.config.endpoints.products.get, product_id);
        self.request(&Request::get(path)).await
    }

    pub async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ClientError> {
        let path =
            fill(&self.config.endpoints.products_by_category, category_id);
        self.request(&Request::get(path)).await
    }

    /// Create or update a product, returning it as stored.
    pub async fn save_product(
        &self,
        details: &ProductDraft,
    ) -> Result<Product, ClientError> {
        let request =
            Request::post(&self.config.endpoints.products.save).json(details)?;
        self.request(&request).await
    }

    pub async fn delete_product(
        &self,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        let path = fill(&self.config.endpoints.products.delete, product_id);
        self.request_empty(&Request::delete(path)).await
    }

    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, ClientError> {
        let request = Request::get(&self.config.endpoints.purchases.list);
        self.request(&request).await
    }

    pub async fn get_purchase(
        &self,
        purchase_id: PurchaseId,
    ) -> Result<Purchase, ClientError> {
        let path = fill(&self.config.endpoints.purchases.get, purchase_id);
        self.request(&Request::get(path)).await
    }

    pub async fn list_purchases_by_client(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<Purchase>, ClientError> {
        let path = fill(&self.config.endpoints.purchases_by_client, client_id);
        self.request(&Request::get(path)).await
    }

    pub async fn create_purchase(
        &self,
        details: &PurchaseDraft,
    ) -> Result<Purchase, ClientError> {
        let request = Request::post(&self.config.endpoints.purchases.save)
            .json(details)?;
        self.request(&request).await
    }

    pub async fn delete_purchase(
        &self,
        purchase_id: PurchaseId,
    ) -> Result<(), ClientError> {
        let path = fill(&self.config.endpoints.purchases.delete, purchase_id);
        self.request_empty(&Request::delete(path)).await
    }

    /// Counts shown on the dashboard. Both lists are fetched concurrently.
    pub async fn dashboard_summary(
        &self,
    ) -> Result<DashboardSummary, ClientError> {
        self.dashboard_summary_with_cancel(&CancellationToken::new())
            .await
    }

    pub async fn dashboard_summary_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DashboardSummary, ClientError> {
        let endpoints = &self.config.endpoints;
        let products = Request::get(&endpoints.products.list);
        let purchases = Request::get(&endpoints.purchases.list);
        let (products, purchases): (Vec<Product>, Vec<Purchase>) =
            futures::try_join!(
                self.request_with_cancel(&products, cancel),
                self.request_with_cancel(&purchases, cancel),
            )?;
        Ok(DashboardSummary {
            product_count: products.len(),
            purchase_count: purchases.len(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardSummary {
    pub product_count: usize,
    pub purchase_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a failure status. Displays the server's
    /// message.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    /// A success status with a body that is empty or not the expected JSON.
    #[error("Unexpected response from the server: {0}")]
    MalformedResponse(String),
    /// The caller gave up on the request. Not meant to be shown to users.
    #[error("Request cancelled")]
    Cancelled,
    #[error("The server took longer than {} ms to respond.", .0.as_millis())]
    Timeout(Duration),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Status code of a server-side failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            _ => None,
        }
    }
}

/// Merge request headers over the defaults. Names compare case-insensitively
/// and later entries win.
pub fn merge_headers(
    defaults: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in defaults.iter().chain(overrides) {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ClientError::InvalidRequest(format!("header name {name:?}: {e}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            ClientError::InvalidRequest(format!("header {name:?}: {e}"))
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Deserialize the body of a successful response into the desired type, or
/// return an appropriate error.
pub fn ok_body<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<T, ClientError> {
    if !status.is_success() {
        return Err(ClientError::APIError(status, error_message(status, body)));
    }
    parse_body(body)
}

/// Check that a response without a meaningful body is OK.
pub fn ok_empty(status: StatusCode, body: &str) -> Result<(), ClientError> {
    if !status.is_success() {
        return Err(ClientError::APIError(status, error_message(status, body)));
    }
    Ok(())
}

pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    if body.trim().is_empty() {
        return Err(ClientError::MalformedResponse("empty body".into()));
    }
    serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

/// The `message` of a JSON error body, or a generic message with the status.
pub fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|error| error.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            format!("Request failed with status {}", status.as_u16())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_server_message() {
        let message =
            error_message(StatusCode::NOT_FOUND, r#"{"message":"not found"}"#);
        assert_eq!(message, "not found");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        let expected = "Request failed with status 500";
        assert_eq!(error_message(StatusCode::INTERNAL_SERVER_ERROR, ""), expected);
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            expected
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":""}"#),
            expected
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"x"}"#),
            expected
        );
    }

    #[test]
    fn failure_status_becomes_api_error() {
        let result: Result<Vec<u32>, _> =
            ok_body(StatusCode::NOT_FOUND, r#"{"message":"not found"}"#);
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn empty_success_body_is_malformed() {
        let result: Result<Vec<u32>, _> = ok_body(StatusCode::OK, "  ");
        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let result: Result<Vec<u32>, _> = ok_body(StatusCode::OK, "[1, 2");
        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn empty_response_ignores_body() {
        assert!(ok_empty(StatusCode::NO_CONTENT, "").is_ok());
        assert!(ok_empty(StatusCode::OK, "true").is_ok());
        assert!(ok_empty(StatusCode::BAD_REQUEST, "").is_err());
    }

    #[test]
    fn content_type_defaults_to_json() {
        let headers = merge_headers(&BTreeMap::new(), &BTreeMap::new()).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn caller_headers_win_case_insensitively() {
        let defaults =
            BTreeMap::from([("X-Store".to_string(), "north".to_string())]);
        let overrides = BTreeMap::from([
            ("content-type".to_string(), "text/plain".to_string()),
            ("x-store".to_string(), "south".to_string()),
        ]);
        let headers = merge_headers(&defaults, &overrides).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers["x-store"], "south");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let overrides =
            BTreeMap::from([("bad header".to_string(), "x".to_string())]);
        let result = merge_headers(&BTreeMap::new(), &overrides);
        assert!(matches!(result, Err(ClientError::InvalidRequest(_))));
    }

    #[test]
    fn cancelled_is_distinguishable() {
        assert!(ClientError::Cancelled.is_cancelled());
        assert!(!ClientError::Timeout(Duration::from_secs(1)).is_cancelled());
        assert_eq!(ClientError::Cancelled.status(), None);
    }
}
