//! Multipart HTTP transport backed by reqwest.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use reqwest::multipart::{Form as MultipartForm, Part};

use crate::error::TransportError;
use crate::form::{FormData, FormValue};
use crate::transport::{FormRequest, FormResponse, FormTransport};

/// Sends forms as `multipart/form-data`.
///
/// Uses reqwest defaults for everything the form itself does not specify:
/// redirects are followed and there is no request timeout.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(concat!("looma-scan/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Use a preconfigured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn multipart_body(data: FormData) -> Result<MultipartForm, TransportError> {
    let mut body = MultipartForm::new();
    for (name, value) in data {
        body = match value {
            FormValue::Text(text) => body.text(name, text),
            FormValue::File(file) => {
                let part = Part::bytes(file.bytes.to_vec())
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| TransportError::InvalidPart {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?;
                body.part(name, part)
            }
        };
    }
    Ok(body)
}

#[async_trait]
impl FormTransport for HttpTransport {
    async fn send(&self, request: FormRequest) -> Result<FormResponse, TransportError> {
        if request.method == Method::GET || request.method == Method::HEAD {
            return Err(TransportError::BodyNotAllowed {
                method: request.method.to_string(),
            });
        }

        let fields = request.body.len();
        let body = multipart_body(request.body)?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            fields,
            "Submitting form"
        );

        let response = self
            .client
            .request(request.method, request.url)
            .multipart(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    TransportError::Connection {
                        reason: e.to_string(),
                    }
                } else {
                    TransportError::Request(e)
                }
            })?;

        let status = response.status().as_u16();
        tracing::debug!(status, "Form submission answered");
        Ok(FormResponse::new(status))
    }
}
