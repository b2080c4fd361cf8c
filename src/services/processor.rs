use std::sync::Arc;
use std::time::Instant;

use duotone_core::{plan, transform, Dimensions, PixelBuffer};

use crate::error::ProcessError;
use crate::models::{AppConfig, ImageFormat, ProcessedImage, Upload};
use crate::rendering::{decode, encode_png, resample};
use crate::services::validate_upload;

/// Runs the full upload-to-PNG pipeline.
///
/// validate -> decode -> plan -> resample -> duotone -> encode
pub struct ProcessingService {
    config: Arc<AppConfig>,
}

impl ProcessingService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// Validate an upload against the configured limits
    pub fn validate(&self, upload: &Upload) -> Result<ImageFormat, ProcessError> {
        validate_upload(upload, self.config.max_upload_bytes)
    }

    /// Process an upload synchronously. CPU heavy; call from a blocking context.
    pub fn process_blocking(
        &self,
        upload: &Upload,
        reversed: bool,
    ) -> Result<ProcessedImage, ProcessError> {
        let started = Instant::now();
        let format = self.validate(upload)?;

        let source = decode(&upload.bytes, format)?;
        let source_dimensions = Dimensions::new(source.width(), source.height());
        let target = plan(source.width(), source.height())?;
        let resized = resample(source, target);

        let mut buffer = PixelBuffer::new(target.width, target.height, resized.into_raw())?;
        let range = transform(&mut buffer, reversed);
        let png_bytes = encode_png(&buffer, self.config.optimize_png)?;

        tracing::info!(
            %format,
            source_width = source_dimensions.width,
            source_height = source_dimensions.height,
            width = target.width,
            height = target.height,
            reversed,
            min_luminance = range.min,
            max_luminance = range.max,
            png_bytes = png_bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Processed image"
        );

        Ok(ProcessedImage::new(
            png_bytes,
            target,
            source_dimensions,
            reversed,
            upload.export_filename(),
        ))
    }

    /// Process an upload without blocking the async runtime
    pub async fn process(
        self: &Arc<Self>,
        upload: Upload,
        reversed: bool,
    ) -> Result<ProcessedImage, ProcessError> {
        let service = Arc::clone(self);
        tokio::task::spawn_blocking(move || service.process_blocking(&upload, reversed))
            .await
            .map_err(|e| ProcessError::Task(e.to_string()))?
    }
}
