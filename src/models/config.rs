use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Largest accepted upload, in bytes (25 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Maximum upload size in bytes
    pub max_upload_bytes: usize,

    /// Quiet period before an orientation change is processed
    pub debounce_ms: u64,

    /// How long image requests wait for an in-flight run
    pub result_wait_ms: u64,

    /// Recompress exported PNGs with oxipng
    pub optimize_png: bool,

    /// Sessions kept in memory before the oldest is evicted
    pub max_sessions: usize,
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        max_upload_bytes = config.max_upload_bytes,
                        debounce_ms = config.debounce_ms,
                        max_sessions = config.max_sessions,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn result_wait(&self) -> Duration {
        Duration::from_millis(self.result_wait_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            debounce_ms: 200,
            result_wait_ms: 5000,
            optimize_png: false,
            max_sessions: 64,
        }
    }
}
