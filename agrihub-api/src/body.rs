//! Request bodies: JSON values and multipart form payloads.

use crate::error::{ApiError, ApiResult};
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use std::path::Path;

/// Body of an outgoing request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Sent as `application/json`.
    Json(Value),
    /// Sent as `multipart/form-data`; the transport picks the boundary.
    Multipart(FormPayload),
}

impl RequestBody {
    /// Returns true if the body carries at least one file part.
    pub fn has_files(&self) -> bool {
        match self {
            RequestBody::Json(_) => false,
            RequestBody::Multipart(form) => form.has_files(),
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<FormPayload> for RequestBody {
    fn from(form: FormPayload) -> Self {
        RequestBody::Multipart(form)
    }
}

/// A file attached to a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Validation(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_for(&file_name);
        Ok(Self::new(file_name, mime, bytes))
    }
}

fn mime_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// One field of a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

/// Ordered multipart form fields, built before the request is sent.
///
/// Field names may repeat (e.g. several `images` parts).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    fields: Vec<(String, FormValue)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Adds a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.fields.push((name.into(), FormValue::File(file)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn has_files(&self) -> bool {
        self.fields
            .iter()
            .any(|(_, v)| matches!(v, FormValue::File(_)))
    }

    /// First text value stored under `name`.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(k, v)| match v {
            FormValue::Text(t) if k == name => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text fields as a JSON object. Later duplicates win; files are skipped.
    pub fn text_fields_json(&self) -> Value {
        let mut map = Map::new();
        for (k, v) in &self.fields {
            if let FormValue::Text(t) = v {
                map.insert(k.clone(), Value::String(t.clone()));
            }
        }
        Value::Object(map)
    }

    pub(crate) fn into_form(self) -> ApiResult<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File(file) => {
                    let part = Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.mime)
                        .map_err(|e| ApiError::Validation(format!("invalid MIME type: {e}")))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}
