//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ChatClient` builds `HttpRequest`
//! values and consumes `HttpResponse` values without touching the network;
//! whoever holds a `Transport` performs the round-trip in between.
//!
//! `ApiResponse` is the normalized `{status, body}` envelope handed back to
//! callers of `ChatSession`. It never interprets the status code.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute: base URL, path and query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Normalized response envelope: the status code and the decoded JSON body.
///
/// An empty body (e.g. a 204) becomes `None`, serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Wrap `response` in an envelope. Any status is accepted as-is; a body
    /// that is not JSON (a proxy's HTML error page, say) is kept as a JSON string.
    pub fn from_http(response: HttpResponse) -> Self {
        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&response.body).unwrap_or(Value::String(response.body)))
        };
        Self {
            status: response.status,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body into `T`. A null body is decoded from JSON `null`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        let value = self.body.clone().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}
