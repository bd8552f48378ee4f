//! Wire payload encodings for create/update operations
//!
//! Text-only entities submit JSON bodies; entities with image attachments
//! submit multipart form data with fixed field names matching what the
//! remote API expects (`title`, `content`, `date`, `file`, `files`, `icon`,
//! `imageUrl`, ...).

use crate::core::error::ApiResult;
use serde::Serialize;

/// An in-memory file attachment staged for upload.
///
/// This is the transient, pre-submission side of an image attribute; after
/// a successful create/update the server responds with a resolved URL and
/// the attachment is no longer relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// File name reported to the server (e.g. "cover.png")
    pub file_name: String,

    /// MIME type of the content (e.g. "image/png")
    pub content_type: String,

    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

/// Value of a multipart form field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(FileAttachment),
}

/// Encoded request body for a create or update operation
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON body
    Json(serde_json::Value),

    /// Multipart form-data body
    Multipart(Vec<FormField>),
}

impl Payload {
    /// Encode a serializable draft as a JSON payload
    pub fn json<T: Serialize>(draft: &T) -> ApiResult<Payload> {
        Ok(Payload::Json(serde_json::to_value(draft)?))
    }

    /// Start an empty multipart form
    pub fn form() -> Payload {
        Payload::Multipart(Vec::new())
    }

    /// Append a text field to a multipart form.
    ///
    /// No-op on JSON payloads; builders only call this on [`Payload::form`].
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Payload {
        if let Payload::Multipart(fields) = &mut self {
            fields.push(FormField {
                name,
                value: FieldValue::Text(value.into()),
            });
        }
        self
    }

    /// Append a file field to a multipart form
    pub fn file(mut self, name: &'static str, attachment: FileAttachment) -> Payload {
        if let Payload::Multipart(fields) = &mut self {
            fields.push(FormField {
                name,
                value: FieldValue::File(attachment),
            });
        }
        self
    }
}
