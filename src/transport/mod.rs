//! Form submission transport.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use reqwest::Method;
use url::Url;

use crate::error::TransportError;
use crate::form::{Form, FormData};

/// One form submission.
#[derive(Debug, Clone)]
pub struct FormRequest {
    pub url: Url,
    pub method: Method,
    pub body: FormData,
}

impl FormRequest {
    /// Snapshot `form` into a request for its own action and method.
    pub fn from_form(form: &Form) -> Self {
        Self {
            url: form.action().clone(),
            method: form.method().clone(),
            body: form.entries(),
        }
    }
}

/// What came back. Only the status is kept; the body is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormResponse {
    pub status: u16,
}

impl FormResponse {
    pub fn new(status: u16) -> Self {
        Self { status }
    }

    /// Any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a form request and reports its status.
///
/// An `Err` means the request never produced a response. Implementations
/// must not retry and must not add a timeout of their own.
#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn send(&self, request: FormRequest) -> Result<FormResponse, TransportError>;
}
