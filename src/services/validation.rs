use crate::error::ProcessError;
use crate::models::{ImageFormat, Upload};

/// Content types that say nothing about the payload; the bytes decide.
const GENERIC_CONTENT_TYPES: [&str; 3] = [
    "application/octet-stream",
    "application/x-www-form-urlencoded",
    "binary/octet-stream",
];

/// Check an upload before any decoding work is done.
///
/// Order matters: emptiness, then size, then format. The format is taken
/// from the magic bytes when they are recognizable; otherwise the declared
/// content type is trusted and decoding reports the failure later.
pub fn validate_upload(upload: &Upload, max_bytes: usize) -> Result<ImageFormat, ProcessError> {
    if upload.bytes.is_empty() {
        return Err(ProcessError::InvalidInput("upload is empty".to_string()));
    }

    if upload.bytes.len() > max_bytes {
        return Err(ProcessError::OversizedInput {
            size: upload.bytes.len(),
            max: max_bytes,
        });
    }

    let sniffed = ImageFormat::sniff(&upload.bytes);
    let declared_type = upload.content_type.as_deref().map(essence);
    let declared = match declared_type.as_deref() {
        None | Some("") => None,
        Some(ct) if GENERIC_CONTENT_TYPES.contains(&ct) => None,
        Some(ct) => match ImageFormat::from_mime(ct) {
            Some(format) => Some(format),
            None => return Err(ProcessError::UnsupportedFormat(ct.to_string())),
        },
    };

    match (sniffed, declared) {
        (Some(sniffed), Some(declared)) if sniffed != declared => {
            tracing::debug!(%declared, %sniffed, "Declared content type disagrees with bytes");
            Ok(sniffed)
        }
        (Some(format), _) | (None, Some(format)) => Ok(format),
        (None, None) => Err(ProcessError::UnsupportedFormat(
            "unrecognized image data".to_string(),
        )),
    }
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
