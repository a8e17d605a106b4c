//! Page-load location autofill.

use std::sync::Arc;

use crate::error::PositionError;
use crate::form::{FieldHandle, Form};
use crate::geolocation::{Coordinates, Geolocation};

/// Logged when no geolocation capability is present.
pub const UNSUPPORTED_WARNING: &str = "Geolocation not supported.";
/// Logged when the position request fails for any reason.
pub const UNAVAILABLE_WARNING: &str = "Location access denied or unavailable.";

/// What a single autofill run did.
#[derive(Debug, Clone, PartialEq)]
pub enum AutofillOutcome {
    /// Both fields were overwritten with these coordinates.
    Filled(Coordinates),
    /// No capability; fields untouched.
    Unsupported,
    /// The request failed; fields untouched.
    Unavailable(PositionError),
}

/// Writes the device position into a latitude and a longitude field.
///
/// Failures are logged as warnings and never reach the user.
pub struct LocationAutofill {
    geolocation: Option<Arc<dyn Geolocation>>,
    latitude: FieldHandle,
    longitude: FieldHandle,
}

impl LocationAutofill {
    pub fn new(
        geolocation: Option<Arc<dyn Geolocation>>,
        latitude: FieldHandle,
        longitude: FieldHandle,
    ) -> Self {
        Self {
            geolocation,
            latitude,
            longitude,
        }
    }

    /// Bind to a form's `latitude` and `longitude` fields.
    ///
    /// A missing field is replaced by a detached handle, so writes to it go
    /// nowhere.
    pub fn for_form(geolocation: Option<Arc<dyn Geolocation>>, form: &Form) -> Self {
        Self::new(
            geolocation,
            form.field("latitude").unwrap_or_default(),
            form.field("longitude").unwrap_or_default(),
        )
    }

    /// Request the position once and fill the fields on success.
    pub async fn run(&self) -> AutofillOutcome {
        let Some(geolocation) = &self.geolocation else {
            tracing::warn!("{}", UNSUPPORTED_WARNING);
            return AutofillOutcome::Unsupported;
        };

        match geolocation.current_position().await {
            Ok(coords) => {
                self.latitude.set_value(coords.latitude_text());
                self.longitude.set_value(coords.longitude_text());
                tracing::debug!(
                    provider = geolocation.name(),
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    "Filled location fields"
                );
                AutofillOutcome::Filled(coords)
            }
            Err(e) => {
                tracing::warn!(provider = geolocation.name(), error = %e, "{}", UNAVAILABLE_WARNING);
                AutofillOutcome::Unavailable(e)
            }
        }
    }
}
