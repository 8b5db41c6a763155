//! Classification request payloads.

use std::fmt;

/// Image mime types the inference provider accepts inline.
pub const SUPPORTED_IMAGE_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/webp", "image/heic", "image/heif"];

/// Decoded image bytes plus their mime type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self { bytes, mime_type: mime_type.into() }
    }
}

// Image bytes are large and uninteresting in logs.
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// One classification call. Built per request, dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationRequest {
    Barcode(String),
    Photo(ImagePayload),
    Text(String),
}

impl ClassificationRequest {
    /// Short label for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Barcode(_) => "barcode",
            Self::Photo(_) => "photo",
            Self::Text(_) => "text",
        }
    }
}
