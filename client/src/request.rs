//! Request descriptors and URL construction.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request body. `Json` is serialized on send, `Raw` is sent as given.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Raw(String),
}

impl Body {
    pub fn into_string(self) -> String {
        match self {
            Body::Json(value) => value.to_string(),
            Body::Raw(text) => text,
        }
    }
}

/// A primitive query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Immutable description of one request against the API.
///
/// Two descriptors are equal when every part is equal, which is what fetch
/// hooks use to decide whether to re-run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Request {
    /// Relative to the configured base URL.
    pub path: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Body>,
    pub params: BTreeMap<String, ParamValue>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            ..Default::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn param(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Attach a value to be sent as JSON.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        self.body = Some(Body::Json(value));
        Ok(self)
    }

    /// Attach an already serialized body.
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }
}

/// Join a base URL and a relative path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Full URL for a request, with the query string appended when there are
/// parameters.
pub fn build_url(
    base: &str,
    path: &str,
    params: &BTreeMap<String, ParamValue>,
) -> Result<String, ClientError> {
    let url = join_url(base, path);
    if params.is_empty() {
        return Ok(url);
    }
    let query = serde_urlencoded::to_string(params)
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
    Ok(format!("{url}?{query}"))
}
