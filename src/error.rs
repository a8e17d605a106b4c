//! Error types for looma-scan.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Why a geolocation request produced no position.
///
/// Mirrors the three failure codes a positioning capability reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("permission to read the device location was denied")]
    PermissionDenied,

    #[error("position unavailable: {reason}")]
    PositionUnavailable { reason: String },

    #[error("timed out waiting for a position")]
    Timeout,
}

/// A form submission request that could not complete.
///
/// Any of these means no HTTP status was received; a response with a
/// non-success status is not an error at this layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The form's method cannot carry a request body.
    #[error("request with {method} method cannot have a body")]
    BodyNotAllowed { method: String },

    /// The server could not be reached (DNS, refused connection, offline).
    #[error("connection failed: {reason}")]
    Connection { reason: String },

    /// TLS, protocol or other client failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid multipart part '{name}': {reason}")]
    InvalidPart { name: String, reason: String },
}

/// Errors building or populating a form.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid form action '{url}': {reason}")]
    InvalidAction { url: String, reason: String },

    #[error("invalid scan link '{url}': {reason}")]
    InvalidScanUrl { url: String, reason: String },

    #[error("no text field named '{name}'")]
    UnknownField { name: String },

    #[error("failed to read file for field '{name}': {source}")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
