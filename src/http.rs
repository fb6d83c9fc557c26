//! HTTP request executor
//!
//! One authenticated round trip per call: build the request, send it,
//! parse the body, map the status. No retries, no backoff, no timeout -
//! a failed request is terminal and surfaces to the caller immediately.

use crate::error::{RequestError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate and strip non-printable characters before logging a body.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX_LOG_BODY_LENGTH)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Thin wrapper over the shared reqwest client.
#[derive(Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("rancha-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| RequestError::new(format!("failed to create HTTP client: {err}")))?;

        Ok(Self { client })
    }

    /// Perform one round trip and return the parsed response payload.
    ///
    /// The body is parsed as JSON; a body that is not JSON is treated as
    /// an empty object, so the error path depends only on the HTTP
    /// status. Non-2xx fails with the payload's `message` field when
    /// present, else the generic fallback.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> Result<Value> {
        tracing::debug!("{} {}", method, url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RequestError::new(format!("invalid header name: {name}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| RequestError::new(format!("invalid header value for {name}")))?;
            headers.insert(name, value);
        }

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        // Unparseable bodies collapse to an empty object; only the
        // status decides success.
        let payload: Value =
            serde_json::from_str(&raw).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&raw));
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty());
            return Err(match message {
                Some(message) => RequestError::new(message),
                None => RequestError::request_failed(),
            });
        }

        Ok(payload)
    }
}

impl Default for HttpExecutor {
    fn default() -> Self {
        Self::new().expect("failed to create default HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated, 500 bytes total"));
        assert!(sanitized.len() < body.len());
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("ok\r\n\tdone"), "okdone");
    }
}
