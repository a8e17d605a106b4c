//! Name validation for the school and technician fields.

use std::sync::LazyLock;

use regex::Regex;

/// One or more ASCII letters or whitespace characters, nothing else.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("name pattern is a valid regex"));

/// Which field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidName {
    School,
    Technician,
}

/// Check a raw field value against the name pattern.
///
/// Leading and trailing whitespace is stripped first; an input that trims
/// to nothing is rejected.
pub fn is_valid_name(raw: &str) -> bool {
    NAME_PATTERN.is_match(raw.trim())
}

/// Validate school then technician, stopping at the first failure.
pub fn validate_names(school: &str, technician: &str) -> Result<(), InvalidName> {
    if !is_valid_name(school) {
        return Err(InvalidName::School);
    }
    if !is_valid_name(technician) {
        return Err(InvalidName::Technician);
    }
    Ok(())
}
