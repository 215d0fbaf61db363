//! Credential forwarding and the handling of 401 answers.
//!
//! Every 401 produced while serving a console page redirects to the login
//! page with a `returnUrl`, except on the configured auth endpoints whose
//! 401 is passed through so that login, registration and refresh cannot loop.

use std::convert::Infallible;
use std::future::{Ready, ready};

use actix_web::http::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName};
use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::backend::Credentials;
use crate::models::config::ServerConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct UnauthorizedPolicy {
    login_path: String,
    excluded_paths: Vec<String>,
}

impl UnauthorizedPolicy {
    pub fn new(login_path: impl Into<String>, excluded_paths: Vec<String>) -> Self {
        Self {
            login_path: login_path.into(),
            excluded_paths,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.login_path.clone(), config.auth_excluded_paths.clone())
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Auth endpoints and the login page itself keep their 401.
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        path == self.login_path.trim_end_matches('/')
            || self.excluded_paths.iter().any(|excluded| {
                let excluded = excluded.trim_end_matches('/');
                path == excluded || path.starts_with(&format!("{excluded}/"))
            })
    }

    /// Redirect location for a 401 on `path_and_query`, or `None` to pass it through.
    pub fn redirect_target(&self, path: &str, path_and_query: &str) -> Option<String> {
        if self.is_excluded(path) {
            return None;
        }
        let separator = if self.login_path.contains('?') { '&' } else { '?' };
        Some(format!(
            "{}{separator}returnUrl={}",
            self.login_path,
            urlencoding::encode(path_and_query)
        ))
    }
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &HeaderName| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        Self {
            cookie: read(&COOKIE),
            authorization: read(&AUTHORIZATION),
        }
    }
}

impl FromRequest for Credentials {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Credentials::from_headers(req.headers())))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    fn policy() -> UnauthorizedPolicy {
        UnauthorizedPolicy::new(
            "/login",
            vec!["/auth/login".into(), "/auth/register".into(), "/auth/refresh".into()],
        )
    }

    #[test]
    fn redirect_carries_the_original_location() {
        assert_eq!(
            policy().redirect_target("/products", "/products?q=whisky&apply=1"),
            Some("/login?returnUrl=%2Fproducts%3Fq%3Dwhisky%26apply%3D1".to_string())
        );
    }

    #[test]
    fn auth_endpoints_are_not_redirected() {
        let policy = policy();
        assert_eq!(policy.redirect_target("/auth/refresh", "/auth/refresh"), None);
        assert_eq!(policy.redirect_target("/login", "/login?returnUrl=%2F"), None);
        assert!(policy.is_excluded("/auth/login/"));
        assert!(!policy.is_excluded("/authorities"));
    }

    #[test]
    fn credentials_are_read_from_headers() {
        let req = TestRequest::default()
            .insert_header((COOKIE, "session=abc"))
            .insert_header((AUTHORIZATION, "Bearer t0k3n"))
            .to_http_request();
        let credentials = Credentials::from_headers(req.headers());
        assert_eq!(credentials.cookie.as_deref(), Some("session=abc"));
        assert_eq!(credentials.authorization.as_deref(), Some("Bearer t0k3n"));
    }
}
