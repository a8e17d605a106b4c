//! Configuration resolved from the environment.
//!
//! `.env` is loaded by the binary with dotenvy before [`Config::from_env`]
//! runs, so values there behave like real environment variables. CLI flags
//! override whatever is resolved here.

mod geolocation;
pub(crate) mod helpers;

pub use geolocation::GeolocationConfig;

use crate::config::helpers::optional_env;
use crate::error::ConfigError;

/// Where and how the device form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// Absolute action URL (`SCAN_FORM_ACTION`).
    pub action: Option<String>,
    /// HTTP method (`SCAN_FORM_METHOD`, default POST).
    pub method: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            action: None,
            method: "POST".to_string(),
        }
    }
}

impl FormConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let action = optional_env("SCAN_FORM_ACTION")?;
        if let Some(ref url) = action
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                key: "SCAN_FORM_ACTION".to_string(),
                message: "must be an absolute http:// or https:// URL".to_string(),
            });
        }

        let method = optional_env("SCAN_FORM_METHOD")?
            .map(|m| m.trim().to_ascii_uppercase())
            .unwrap_or_else(|| "POST".to_string());

        Ok(Self { action, method })
    }

    /// The action URL, or an error explaining how to set it.
    pub fn require_action(&self) -> Result<&str, ConfigError> {
        self.action
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired {
                key: "SCAN_FORM_ACTION".to_string(),
                hint: "Set SCAN_FORM_ACTION or pass --action".to_string(),
            })
    }
}

/// Full runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub form: FormConfig,
    pub geolocation: GeolocationConfig,
}

impl Config {
    /// Resolve from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            form: FormConfig::resolve()?,
            geolocation: GeolocationConfig::resolve()?,
        })
    }
}

/// Serializes tests that modify process environment variables.
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
