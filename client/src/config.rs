use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8090";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the API client needs to know about the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// None waits forever.
    pub timeout: Option<Duration>,
    /// Sent with every request; request headers win on conflict.
    pub default_headers: BTreeMap<String, String>,
    pub endpoints: Endpoints,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Some(DEFAULT_TIMEOUT),
            default_headers: BTreeMap::new(),
            endpoints: Endpoints::default(),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// - API_BASE_URL: backend address, defaults to http://localhost:8090
    /// - API_TIMEOUT_MS: request timeout in milliseconds, 0 disables it
    pub fn from_env() -> Self {
        use std::env::var;

        let base_url = var("API_BASE_URL").unwrap_or_else(|_| {
            tracing::warn!(
                "API_BASE_URL is not set, using the default {DEFAULT_BASE_URL}"
            );
            DEFAULT_BASE_URL.to_string()
        });
        let mut config = Self::new(base_url);

        if let Ok(timeout) = var("API_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(ms) => config.timeout = Some(Duration::from_millis(ms)),
                Err(e) => tracing::warn!(
                    "Ignoring invalid API_TIMEOUT_MS {timeout:?}: {e}"
                ),
            }
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

/// Path templates for the backend routes. `{id}` is replaced by the record
/// id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub products: ResourceRoutes,
    pub products_by_category: String,
    pub purchases: ResourceRoutes,
    pub purchases_by_client: String,
    pub clients: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            products: ResourceRoutes {
                list: "/products/all".into(),
                get: "/products/{id}".into(),
                save: "/products/save".into(),
                delete: "/products/delete/{id}".into(),
            },
            products_by_category: "/products/category/{id}".into(),
            purchases: ResourceRoutes {
                list: "/purchases/all".into(),
                get: "/purchases/{id}".into(),
                save: "/purchases/create".into(),
                delete: "/purchases/delete/{id}".into(),
            },
            purchases_by_client: "/purchases/client/{id}".into(),
            clients: "/customers/all".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceRoutes {
    pub list: String,
    pub get: String,
    pub save: String,
    pub delete: String,
}

/// Substitute `{id}` in a path template. The id is percent-encoded as a
/// single path segment.
pub fn fill(template: &str, id: impl std::fmt::Display) -> String {
    template.replace("{id}", &urlencoding::encode(&id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_replaces_placeholder() {
        assert_eq!(fill("/products/delete/{id}", 12), "/products/delete/12");
        assert_eq!(fill("/purchases/all", 12), "/purchases/all");
    }

    #[test]
    fn fill_keeps_the_id_in_one_segment() {
        assert_eq!(
            fill("/purchases/client/{id}", "ana maria/2?x"),
            "/purchases/client/ana%20maria%2F2%3Fx"
        );
        assert_eq!(
            fill("/purchases/client/{id}", "AB-12_c.d~"),
            "/purchases/client/AB-12_c.d~"
        );
    }

    #[test]
    fn endpoints_can_be_partially_overridden() {
        let endpoints: Endpoints = serde_json::from_str(
            r#"{"purchases_by_client": "/compras/cliente/{id}"}"#,
        )
        .unwrap();
        assert_eq!(endpoints.purchases_by_client, "/compras/cliente/{id}");
        assert_eq!(endpoints.products.list, "/products/all");
    }

    #[test]
    fn new_config_has_default_timeout() {
        let config = ClientConfig::new("http://h");
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
        assert!(config.default_headers.is_empty());
    }
}
