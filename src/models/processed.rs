use axum::body::Bytes;
use duotone_core::Dimensions;
use sha2::{Digest, Sha256};

/// A finished duotone rendition, encoded and ready to serve
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Encoded PNG bytes
    pub png_bytes: Bytes,
    /// Size of the rendition (after planning)
    pub dimensions: Dimensions,
    /// Size of the decoded source
    pub source_dimensions: Dimensions,
    /// Orientation the rendition was produced with
    pub reversed: bool,
    /// Hex SHA-256 of `png_bytes`
    pub content_hash: String,
    /// Suggested download name
    pub filename: String,
    /// When processing finished
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl ProcessedImage {
    pub fn new(
        png_bytes: Vec<u8>,
        dimensions: Dimensions,
        source_dimensions: Dimensions,
        reversed: bool,
        filename: String,
    ) -> Self {
        let content_hash = content_hash(&png_bytes);
        Self {
            png_bytes: Bytes::from(png_bytes),
            dimensions,
            source_dimensions,
            reversed,
            content_hash,
            filename,
            completed_at: chrono::Utc::now(),
        }
    }

    /// Quoted entity tag for HTTP caching
    pub fn etag(&self) -> String {
        format!("\"{}\"", &self.content_hash[..16])
    }
}

/// Compute the hex SHA-256 of encoded image bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
