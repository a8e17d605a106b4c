//! Shared handles to individual form controls.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;

use crate::error::FormError;

#[derive(Debug, Default)]
struct TextState {
    value: String,
    default_value: String,
}

/// Handle to a text control.
///
/// Clones refer to the same control, so a handle given to the location
/// autofill and the form that owns it observe the same value.
#[derive(Debug, Clone, Default)]
pub struct FieldHandle {
    state: Arc<RwLock<TextState>>,
}

impl FieldHandle {
    /// Create an empty control.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a control whose initial value is `default_value`.
    pub fn with_default(default_value: impl Into<String>) -> Self {
        let default_value = default_value.into();
        Self {
            state: Arc::new(RwLock::new(TextState {
                value: default_value.clone(),
                default_value,
            })),
        }
    }

    /// Current value.
    pub fn value(&self) -> String {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }

    /// Overwrite the current value.
    pub fn set_value(&self, value: impl Into<String>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .value = value.into();
    }

    /// Value the control returns to on reset.
    pub fn default_value(&self) -> String {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .default_value
            .clone()
    }

    /// Set both the current and the reset value.
    pub fn set_default_value(&self, value: impl Into<String>) {
        let value = value.into();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.value = value.clone();
        state.default_value = value;
    }

    /// Restore the initial value.
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.value = state.default_value.clone();
    }
}

/// A file selected in a file control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FilePart {
    /// Create a file part from in-memory content.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// The part a file control submits when nothing is selected.
    pub fn empty() -> Self {
        Self::new("", "application/octet-stream", Bytes::new())
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(field: &str, path: &Path) -> Result<Self, FormError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| FormError::FileRead {
                name: field.to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(file_name, content_type, bytes))
    }
}

/// Handle to a file control. Empty until a file is selected.
#[derive(Debug, Clone, Default)]
pub struct FileHandle {
    selected: Arc<RwLock<Option<FilePart>>>,
}

impl FileHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, file: FilePart) {
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = Some(file);
    }

    pub fn selected(&self) -> Option<FilePart> {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear the selection.
    pub fn reset(&self) {
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
