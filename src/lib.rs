//! Client for the Looma device registration form.
//!
//! Two independent behaviors hang off a form:
//!
//! - [`geolocation::LocationAutofill`] writes the device position into the
//!   `latitude` and `longitude` fields once per page load.
//! - [`submit::SubmitHandler`] validates the `school` and `technician`
//!   names, sends the whole form through a [`transport::FormTransport`] and
//!   reports the outcome through a [`notify::Notifier`].
//!
//! Capabilities are injected, so everything runs without a browser.

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod geolocation;
pub mod notify;
pub mod submit;
pub mod testing;
pub mod transport;
pub mod validation;
