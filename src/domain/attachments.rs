//! Attachment screening: MIME allow-list and size cap.

use thiserror::Error;

/// Largest accepted attachment unless deployment configuration says
/// otherwise.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Content types the contact form accepts.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/illustrator",
    "image/vnd.adobe.photoshop",
];

/// Why one attachment was rejected. A rejection excludes that file from the
/// preview list but never blocks the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentRejection {
    #[error("File type not supported: {name}")]
    UnsupportedType { name: String },
    #[error("File too large (Max {max_megabytes}MB): {name}")]
    TooLarge { name: String, max_megabytes: u64 },
}

/// Check one attachment against the allow-list and the size cap. The cap is
/// inclusive; the rejection message names it in whole megabytes.
pub fn screen_attachment(
    name: &str,
    content_type: &str,
    size_bytes: u64,
    max_bytes: u64,
) -> Result<(), AttachmentRejection> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(AttachmentRejection::UnsupportedType {
            name: name.to_string(),
        });
    }
    if size_bytes > max_bytes {
        return Err(AttachmentRejection::TooLarge {
            name: name.to_string(),
            max_megabytes: max_bytes / (1024 * 1024),
        });
    }
    Ok(())
}

/// Preview entry for an accepted attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPreview {
    pub name: String,
    pub size_label: String,
    pub is_image: bool,
}

impl AttachmentPreview {
    pub fn new(name: &str, content_type: &str, size_bytes: u64) -> Self {
        Self {
            name: name.to_string(),
            size_label: format_megabytes(size_bytes),
            is_image: content_type.starts_with("image/"),
        }
    }
}

/// Decimal megabytes with two fraction digits, e.g. `2.40 MB`.
pub fn format_megabytes(size_bytes: u64) -> String {
    let megabytes = size_bytes as f64 / 1024.0 / 1024.0;
    format!("{megabytes:.2} MB")
}
