use std::sync::Arc;

use crate::config::helpers::{optional_env, parse_optional_env};
use crate::error::ConfigError;
use crate::geolocation::{
    Coordinates, DeniedGeolocation, FixedGeolocation, Geolocation, HttpGeolocation,
};

/// Where the device position comes from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GeolocationConfig {
    /// No capability: autofill logs "not supported" and does nothing.
    #[default]
    None,
    /// A known position.
    Fixed(Coordinates),
    /// A JSON location endpoint.
    Http { url: url::Url },
    /// A capability that always refuses.
    Denied,
}

impl GeolocationConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let provider = optional_env("SCAN_GEO_PROVIDER")?
            .unwrap_or_else(|| "none".to_string())
            .to_lowercase();

        match provider.as_str() {
            "none" => Ok(Self::None),
            "denied" => Ok(Self::Denied),
            "fixed" => {
                let latitude = parse_required_f64("SCAN_GEO_LATITUDE")?;
                let longitude = parse_required_f64("SCAN_GEO_LONGITUDE")?;
                Ok(Self::Fixed(Coordinates::new(latitude, longitude)))
            }
            "http" => {
                let raw = optional_env("SCAN_GEO_URL")?.ok_or_else(|| {
                    ConfigError::MissingRequired {
                        key: "SCAN_GEO_URL".to_string(),
                        hint: "SCAN_GEO_URL is required when SCAN_GEO_PROVIDER=http".to_string(),
                    }
                })?;
                let url = raw.parse().map_err(|e| ConfigError::InvalidValue {
                    key: "SCAN_GEO_URL".to_string(),
                    message: format!("{e}"),
                })?;
                Ok(Self::Http { url })
            }
            other => Err(ConfigError::InvalidValue {
                key: "SCAN_GEO_PROVIDER".to_string(),
                message: format!("'{other}' is not one of none, fixed, http, denied"),
            }),
        }
    }

    /// Build the capability, or `None` when geolocation is unsupported.
    pub fn build(&self) -> Option<Arc<dyn Geolocation>> {
        match self {
            Self::None => None,
            Self::Fixed(coords) => Some(Arc::new(FixedGeolocation::new(*coords))),
            Self::Http { url } => Some(Arc::new(HttpGeolocation::new(url.clone()))),
            Self::Denied => Some(Arc::new(DeniedGeolocation)),
        }
    }
}

fn parse_required_f64(key: &str) -> Result<f64, ConfigError> {
    if optional_env(key)?.is_none() {
        return Err(ConfigError::MissingRequired {
            key: key.to_string(),
            hint: format!("{key} is required when SCAN_GEO_PROVIDER=fixed"),
        });
    }
    let value: f64 = parse_optional_env(key, f64::NAN)?;
    if !value.is_finite() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be a finite number".to_string(),
        });
    }
    Ok(value)
}
