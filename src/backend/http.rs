//! `reqwest` implementation of the transport.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE};
use serde_json::Value;

use crate::backend::errors::decode_response;
use crate::backend::{ApiRequest, BackendError, BackendResult, Credentials, Method, Transport};

/// Talks to `backend_url + api_prefix`.
///
/// No timeout, retry or cache is layered on top: each call is exactly one
/// round trip and its outcome is reported as is.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(backend_url: &str, api_prefix: &str) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| BackendError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: join_base(backend_url, api_prefix),
            credentials: Credentials::default(),
        })
    }

    /// Copy of this transport acting on behalf of the given user.
    ///
    /// The underlying connection pool is shared.
    pub fn with_credentials(&self, credentials: Credentials) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Joins the backend origin and the API prefix without doubling slashes.
fn join_base(backend_url: &str, api_prefix: &str) -> String {
    let origin = backend_url.trim_end_matches('/');
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        origin.to_string()
    } else {
        format!("{origin}/{prefix}")
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> BackendResult<Value> {
        let url = self.url(&request.path);
        let mut builder = self.client.request(to_reqwest(request.method), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(cookie) = &self.credentials.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(authorization) = &self.credentials.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let response = builder.send().await.map_err(|err| {
            log::error!("Request to {url} failed: {err}");
            BackendError::Network(err.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| BackendError::Network(err.to_string()))?;

        decode_response(status, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_joins_origin_and_prefix() {
        assert_eq!(join_base("http://localhost:3000/", "/api"), "http://localhost:3000/api");
        assert_eq!(join_base("http://localhost:3000", "api/"), "http://localhost:3000/api");
        assert_eq!(join_base("http://localhost:3000", ""), "http://localhost:3000");
    }

    #[test]
    fn request_urls_are_relative_to_the_api_base() {
        let transport = HttpTransport::new("http://backend", "/api").unwrap();
        assert_eq!(transport.url("/zones/3"), "http://backend/api/zones/3");
        assert_eq!(transport.base_url(), "http://backend/api");
    }

    #[test]
    fn credentials_are_attached_to_a_copy() {
        let transport = HttpTransport::new("http://backend", "/api").unwrap();
        let user = transport.with_credentials(Credentials {
            cookie: Some("session=abc".into()),
            authorization: None,
        });
        assert!(transport.credentials.is_empty());
        assert_eq!(user.credentials.cookie.as_deref(), Some("session=abc"));
    }

    #[actix_web::test]
    async fn unreachable_backend_is_a_network_error() {
        let transport = HttpTransport::new("http://127.0.0.1:9", "/api").unwrap();
        let result = transport.send(ApiRequest::get("/products")).await;
        assert!(matches!(result, Err(BackendError::Network(_))));
    }
}
