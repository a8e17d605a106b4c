//! In-memory form model.
//!
//! A [`Form`] stands in for the page's form element: it knows where it
//! submits (action URL and method) and owns an ordered list of named
//! controls. Controls are shared handles, so the location autofill can be
//! handed the `latitude`/`longitude` handles directly while the submit
//! handler works on the whole form.

mod device;
mod field;

pub use device::{DEVICE_FIELDS, device_form, prefill_from_scan_url};
pub use field::{FieldHandle, FileHandle, FilePart};

use reqwest::Method;
use url::Url;

use crate::error::FormError;

/// A named control in document order.
#[derive(Debug, Clone)]
pub enum Control {
    Text { name: String, handle: FieldHandle },
    File { name: String, handle: FileHandle },
}

impl Control {
    pub fn name(&self) -> &str {
        match self {
            Control::Text { name, .. } | Control::File { name, .. } => name,
        }
    }
}

/// Value of one submitted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

/// Snapshot of a form's entries, ready to be multipart-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((name.into(), FormValue::Text(value.into())));
    }

    pub fn append_file(&mut self, name: impl Into<String>, file: FilePart) {
        self.entries.push((name.into(), FormValue::File(file)));
    }

    /// First text value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|(n, v)| match v {
            FormValue::Text(text) if n == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn entries(&self) -> &[(String, FormValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FormData {
    type Item = (String, FormValue);
    type IntoIter = std::vec::IntoIter<(String, FormValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A submittable form.
///
/// Cloning a `Form` yields another reference to the same controls.
#[derive(Debug, Clone)]
pub struct Form {
    action: Url,
    method: Method,
    controls: Vec<Control>,
}

impl Form {
    /// Create an empty form submitting to `action` with `method`.
    ///
    /// The method follows form-element rules: `post` in any case is POST,
    /// and every other value (including `put`, `dialog` and the empty
    /// string) falls back to GET.
    pub fn new(action: &str, method: &str) -> Result<Self, FormError> {
        let action = Url::parse(action).map_err(|e| FormError::InvalidAction {
            url: action.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(action.scheme(), "http" | "https") {
            return Err(FormError::InvalidAction {
                url: action.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        let method = parse_method(method);

        Ok(Self {
            action,
            method,
            controls: Vec::new(),
        })
    }

    /// Append a text control and return its handle.
    pub fn add_text(&mut self, name: impl Into<String>) -> FieldHandle {
        let handle = FieldHandle::new();
        self.controls.push(Control::Text {
            name: name.into(),
            handle: handle.clone(),
        });
        handle
    }

    /// Append a file control and return its handle.
    pub fn add_file(&mut self, name: impl Into<String>) -> FileHandle {
        let handle = FileHandle::new();
        self.controls.push(Control::File {
            name: name.into(),
            handle: handle.clone(),
        });
        handle
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Handle of the first text control named `name`.
    pub fn field(&self, name: &str) -> Option<FieldHandle> {
        self.controls.iter().find_map(|c| match c {
            Control::Text { name: n, handle } if n == name => Some(handle.clone()),
            _ => None,
        })
    }

    /// Handle of the first file control named `name`.
    pub fn file(&self, name: &str) -> Option<FileHandle> {
        self.controls.iter().find_map(|c| match c {
            Control::File { name: n, handle } if n == name => Some(handle.clone()),
            _ => None,
        })
    }

    /// Set the value of the text control named `name`.
    pub fn set(&self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = self.field(name).ok_or_else(|| FormError::UnknownField {
            name: name.to_string(),
        })?;
        field.set_value(value);
        Ok(())
    }

    /// Current value of `name`, or an empty string when there is no such field.
    pub fn value(&self, name: &str) -> String {
        self.field(name).map(|f| f.value()).unwrap_or_default()
    }

    /// Snapshot every control, text and file alike, in document order.
    pub fn entries(&self) -> FormData {
        let mut data = FormData::new();
        for control in &self.controls {
            match control {
                Control::Text { name, handle } => data.append_text(name.clone(), handle.value()),
                Control::File { name, handle } => data.append_file(
                    name.clone(),
                    handle.selected().unwrap_or_else(FilePart::empty),
                ),
            }
        }
        data
    }

    /// Return every control to its initial state.
    pub fn reset(&self) {
        for control in &self.controls {
            match control {
                Control::Text { handle, .. } => handle.reset(),
                Control::File { handle, .. } => handle.reset(),
            }
        }
    }
}

fn parse_method(method: &str) -> Method {
    if method.trim().eq_ignore_ascii_case("post") {
        Method::POST
    } else {
        Method::GET
    }
}
