//! The HTTP collaborator seam.
//!
//! `Transport` turns an `HttpRequest` into an `HttpResponse`. Any HTTP
//! library can sit behind it; `UreqTransport` (feature `ureq`) is the blocking
//! implementation shipped with the crate.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    /// Execute `request` once. Non-2xx statuses are returned as data, never as `Err`.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq::Agent`.
    ///
    /// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
    /// responses reach the caller unchanged.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            log::debug!("executing {} {}", request.method.as_str(), request.url);
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;

            let result = match (method, body) {
                (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &headers).call(),
                (HttpMethod::Delete, _) => with_headers(self.agent.delete(&url), &headers).call(),
                (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(&url), &headers).send(body.as_bytes()),
                (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &headers).send_empty(),
                (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(&url), &headers).send(body.as_bytes()),
                (HttpMethod::Put, None) => with_headers(self.agent.put(&url), &headers).send_empty(),
            };
            let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            log::debug!("{method:?} {url} -> {status}");

            Ok(HttpResponse { status, headers, body })
        }
    }
}
