//! Device geolocation and location autofill.
//!
//! A [`Geolocation`] is an optional capability: callers hold an
//! `Option<Arc<dyn Geolocation>>` and treat `None` as "not supported".
//! Each call to [`Geolocation::current_position`] is a single one-shot
//! request; providers apply their own timeouts, this module adds none.

mod autofill;
mod provider;

pub use autofill::{AutofillOutcome, LocationAutofill};
pub use provider::{DeniedGeolocation, FixedGeolocation, HttpGeolocation};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PositionError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude as written into a form field: shortest round-trip decimal,
    /// no rounding.
    pub fn latitude_text(&self) -> String {
        self.latitude.to_string()
    }

    /// Longitude as written into a form field.
    pub fn longitude_text(&self) -> String {
        self.longitude.to_string()
    }
}

/// Source of the device's current position.
#[async_trait]
pub trait Geolocation: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Request the current position once.
    async fn current_position(&self) -> Result<Coordinates, PositionError>;
}
