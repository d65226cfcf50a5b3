//! Shared state of the mock API: the records plus the knobs tests use to
//! script failures and slow responses.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use actix_web::HttpRequest;

use crate::store::MarketStore;

/// A canned response returned instead of the real handler's.
#[derive(Debug, Clone)]
pub struct Stub {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
pub struct MockBackend {
    store: Mutex<MarketStore>,
    stubs: Mutex<HashMap<String, Stub>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockBackend {
    pub fn store(&self) -> MutexGuard<'_, MarketStore> {
        self.store.lock().unwrap()
    }

    /// Answer every request to `path` with `status` and `body`.
    pub fn stub(&self, path: &str, status: u16, body: &str) {
        self.stubs.lock().unwrap().insert(
            path.to_string(),
            Stub {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn clear_stub(&self, path: &str) {
        self.stubs.lock().unwrap().remove(path);
    }

    pub fn stub_for(&self, path: &str) -> Option<Stub> {
        self.stubs.lock().unwrap().get(path).cloned()
    }

    /// Hold every response to `path` for `delay`.
    pub fn set_delay(&self, path: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(path.to_string(), delay);
    }

    pub fn clear_delay(&self, path: &str) {
        self.delays.lock().unwrap().remove(path);
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }

    /// Record an incoming request, returning how long to hold its response.
    pub fn record(&self, req: &HttpRequest) -> Option<Duration> {
        tracing::debug!(method = %req.method(), path = req.path(), "mock request");
        let recorded = RecordedRequest {
            method: req.method().to_string(),
            path: req.path().to_string(),
            query: req.query_string().to_string(),
            headers: req
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect(),
        };
        self.requests.lock().unwrap().push(recorded);
        self.delays.lock().unwrap().get(req.path()).copied()
    }
}
