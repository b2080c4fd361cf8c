use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Suffix appended to the original file stem for downloads
pub const EXPORT_SUFFIX: &str = "_brave-pink-hero-green-1312.png";

/// Raster formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
}

impl ImageFormat {
    /// MIME types accepted from clients (`image/jpg` is a common alias)
    pub const ACCEPTED_MIME: [&'static str; 4] =
        ["image/jpeg", "image/jpg", "image/png", "image/webp"];

    /// Resolve a declared content type. Parameters after `;` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Identify a format from its magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::WebP)
        } else {
            None
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "jpeg"),
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::WebP => write!(f, "webp"),
        }
    }
}

/// A user-supplied source image, not yet validated.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Bytes,
    /// Content type declared by the client, if any
    pub content_type: Option<String>,
    /// Original file name, if known
    pub filename: Option<String>,
}

impl Upload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
            filename: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Download name for the duotone rendition of this upload.
    ///
    /// The last extension of the original name is replaced by
    /// [`EXPORT_SUFFIX`]. Directory components, non-ASCII characters and
    /// characters that would break a `Content-Disposition` header are dropped.
    pub fn export_filename(&self) -> String {
        let stem = self
            .filename
            .as_deref()
            .map(sanitize_stem)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "image".to_string());
        format!("{stem}{EXPORT_SUFFIX}")
    }
}

fn sanitize_stem(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = match base.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem,
        _ => base,
    };
    stem.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"' && *c != ';')
        .collect::<String>()
        .trim()
        .to_string()
}
