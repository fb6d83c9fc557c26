//! API client
//!
//! Combines the token resolver and the HTTP executor with the deployment
//! base URL. All endpoint paths in the resource modules are relative to
//! the base; the client owns URL and query-string assembly.

use crate::auth::AuthTokens;
use crate::error::{RequestError, Result};
use crate::http::HttpExecutor;
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Environment variable supplying the backend base URL.
pub const BASE_URL_ENV: &str = "RANCHA_API_BASE_URL";

/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Authenticated client for the Casa Rancha admin API.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpExecutor,
    auth: AuthTokens,
    base_url: String,
}

impl ApiClient {
    /// Create a client against an explicit base URL.
    pub fn new(base_url: &str, auth: AuthTokens) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|err| RequestError::new(format!("invalid base URL {base_url}: {err}")))?;

        Ok(Self {
            http: HttpExecutor::new()?,
            auth,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from `RANCHA_API_BASE_URL`, falling back to the
    /// local development default.
    pub fn from_env(auth: AuthTokens) -> Result<Self> {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url, auth)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthTokens {
        &self.auth
    }

    /// Build an absolute URL from a relative path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build an absolute URL with a query string.
    pub fn url_with_params(&self, path: &str, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return self.url(path);
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{}?{}", self.url(path), query)
    }

    /// One round trip with full control over method, body, and headers.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> Result<Value> {
        let token = self.auth.resolve().await?;
        self.http
            .request(method, url, token.as_deref(), body, extra_headers)
            .await
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, &self.url(path), None, &[]).await
    }

    pub async fn get_with_params(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, &self.url_with_params(path, params), None, &[])
            .await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, &self.url(path), Some(body), &[])
            .await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PATCH, &self.url(path), Some(body), &[])
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, &self.url(path), None, &[])
            .await
    }
}
