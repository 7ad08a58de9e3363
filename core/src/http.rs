//! HTTP transport types and the `Transport` capability.
//!
//! # Design
//! Requests and responses are plain data. `PostcodeClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; whoever executes the round-trip is either the host itself or a
//! `Transport` injected into the client. Production code injects
//! `UreqTransport`, tests inject a scripted transport, and nothing in the
//! crate reaches for a global HTTP client.
//!
//! Non-2xx statuses are data, not transport errors: the client reads the
//! JSON envelope to decide what a status means.

use std::error::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Network-level failure reported by a `Transport`.
pub type TransportError = Box<dyn Error + Send + Sync>;

/// Executes an `HttpRequest` and returns whatever the server answered.
///
/// Implementations must return 4xx/5xx responses as `Ok` and reserve `Err`
/// for failures where no response exists (DNS, refused connection, timeout).
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
