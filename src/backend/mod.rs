//! Access to the REST backend.
//!
//! Every backend interaction goes through the object-safe [`Transport`] seam:
//! one [`ApiRequest`] in, one decoded JSON body out. The production
//! implementation lives in [`http`], test doubles in [`mock`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use errors::{ApiErrorBody, BackendError, BackendResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// A single request against the API base path.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attaches a JSON body, failing with [`BackendError::Decode`] when the
    /// payload cannot be serialized.
    pub fn with_json<P: Serialize + ?Sized>(mut self, payload: &P) -> BackendResult<Self> {
        let body = serde_json::to_value(payload)
            .map_err(|err| BackendError::Decode(format!("cannot encode payload: {err}")))?;
        self.body = Some(body);
        Ok(self)
    }
}

/// Credentials of the signed-in user, forwarded verbatim to the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Credentials {
    pub cookie: Option<String>,
    pub authorization: Option<String>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.cookie.is_none() && self.authorization.is_none()
    }
}

/// Sends one request and returns the decoded body of a successful response.
///
/// Empty bodies decode to `Value::Null`. Non-2xx answers become
/// [`BackendError`] values carrying the backend's payload untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> BackendResult<Value>;
}

#[async_trait]
impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    async fn send(&self, request: ApiRequest) -> BackendResult<Value> {
        (**self).send(request).await
    }
}
