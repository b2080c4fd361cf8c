pub mod config;
pub mod processed;
pub mod session;
pub mod upload;

pub use config::{AppConfig, DEFAULT_MAX_UPLOAD_BYTES};
pub use processed::{content_hash, ProcessedImage};
pub use session::SessionId;
pub use upload::{ImageFormat, Upload, EXPORT_SUFFIX};
