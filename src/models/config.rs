//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_auth_excluded_paths() -> Vec<String> {
    vec![
        "/auth/login".to_string(),
        "/auth/register".to_string(),
        "/auth/refresh".to_string(),
    ]
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the admin console server.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Origin of the REST backend, e.g. `http://localhost:3000`.
    pub backend_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    pub templates_dir: String,
    /// Signing key for flash message cookies, at least 64 bytes.
    pub secret: String,
    /// Where a 401 sends the user, with `returnUrl` appended.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Paths whose 401 answers are passed through instead of redirected.
    #[serde(default = "default_auth_excluded_paths")]
    pub auth_excluded_paths: Vec<String>,
}
