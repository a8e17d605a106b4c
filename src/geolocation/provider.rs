//! Geolocation providers.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::PositionError;
use crate::geolocation::{Coordinates, Geolocation};

/// A device with a known, configured position.
#[derive(Debug, Clone)]
pub struct FixedGeolocation {
    coordinates: Coordinates,
}

impl FixedGeolocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl Geolocation for FixedGeolocation {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Ok(self.coordinates)
    }
}

/// A provider whose user refused the location prompt.
#[derive(Debug, Clone, Default)]
pub struct DeniedGeolocation;

#[async_trait]
impl Geolocation for DeniedGeolocation {
    fn name(&self) -> &str {
        "denied"
    }

    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        Err(PositionError::PermissionDenied)
    }
}

/// Position lookup against a JSON endpoint.
///
/// Expects a body like `{"latitude": 27.7, "longitude": 85.3}`; `lat`/`lon`
/// are accepted as well.
pub struct HttpGeolocation {
    url: url::Url,
    client: reqwest::Client,
}

impl HttpGeolocation {
    pub fn new(url: url::Url) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("looma-scan/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { url, client }
    }
}

#[async_trait]
impl Geolocation for HttpGeolocation {
    fn name(&self) -> &str {
        "http"
    }

    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PositionError::Timeout
                } else {
                    PositionError::PositionUnavailable {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PositionError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(PositionError::PositionUnavailable {
                reason: format!("location service returned {}", status),
            });
        }

        response
            .json::<Coordinates>()
            .await
            .map_err(|e| PositionError::PositionUnavailable {
                reason: format!("unreadable location response: {}", e),
            })
    }
}
