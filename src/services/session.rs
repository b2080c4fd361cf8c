//! Interactive processing sessions.
//!
//! A session owns one source photo and its current orientation. Every
//! request that changes either bumps the session's generation; a run only
//! publishes its result if its generation is still current when it
//! finishes, so a slow earlier run can never overwrite a later one.
//! Orientation toggles are debounced: bursts collapse into the last one.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use utoipa::ToSchema;

use crate::error::{ErrorKind, ProcessError};
use crate::models::{ProcessedImage, SessionId, Upload};
use crate::services::ProcessingService;

/// A run that ended in an error, as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RunFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ProcessError> for RunFailure {
    fn from(error: &ProcessError) -> Self {
        Self {
            kind: error.kind(),
            message: error.user_message(),
        }
    }
}

/// Outcome of the most recent publishing run
#[derive(Debug, Clone)]
pub enum SessionOutput {
    Pending,
    Ready(Arc<ProcessedImage>),
    Failed(RunFailure),
}

impl SessionOutput {
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionOutput::Pending)
    }
}

/// Output tagged with the generation that produced it
#[derive(Debug, Clone)]
pub struct Published {
    pub generation: u64,
    pub output: SessionOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The current generation has not produced a result yet
    Pending,
    Ready,
    Failed,
}

/// Session summary returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionInfo {
    pub id: String,
    pub generation: u64,
    pub reversed: bool,
    pub status: SessionStatus,
    /// Download name of the rendition
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RunFailure>,
    /// RFC 3339 time the current rendition finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Number of pipeline runs actually executed
    pub runs: u64,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

struct SessionState {
    source: Upload,
    reversed: bool,
}

pub struct Session {
    id: SessionId,
    processor: Arc<ProcessingService>,
    debounce: Duration,
    generation: AtomicU64,
    runs: AtomicU64,
    // Generation bumps happen under this lock so a run always sees the
    // state belonging to the generation it checked.
    state: Mutex<SessionState>,
    published: watch::Sender<Published>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    /// Create a session for an already validated upload. Nothing is
    /// processed until [`Session::start`] is called.
    pub fn new(
        id: SessionId,
        source: Upload,
        processor: Arc<ProcessingService>,
        debounce: Duration,
    ) -> Arc<Self> {
        let (published, _) = watch::channel(Published {
            generation: 1,
            output: SessionOutput::Pending,
        });
        Arc::new(Self {
            id,
            processor,
            debounce,
            generation: AtomicU64::new(1),
            runs: AtomicU64::new(0),
            state: Mutex::new(SessionState {
                source,
                reversed: false,
            }),
            published,
            created_at: chrono::Utc::now(),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    /// The most recently requested generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Number of pipeline runs that were not skipped by the debounce
    pub fn run_count(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    /// Process the initial source immediately
    pub fn start(self: &Arc<Self>) {
        self.spawn_run(self.generation(), Duration::ZERO);
    }

    /// Swap in a new source photo.
    ///
    /// The upload is validated before anything changes; a rejected upload
    /// leaves the session untouched. Orientation resets to normal and the
    /// previous result is released.
    pub async fn replace_source(self: &Arc<Self>, source: Upload) -> Result<u64, ProcessError> {
        self.processor.validate(&source)?;

        let generation = {
            let mut state = self.state.lock().await;
            state.source = source;
            state.reversed = false;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        self.publish(generation, SessionOutput::Pending);

        tracing::info!(session = %self.id, generation, "Source replaced");
        self.spawn_run(generation, Duration::ZERO);
        Ok(generation)
    }

    /// Request a new orientation. Processing starts after the debounce
    /// period unless another request arrives first. The previous result
    /// stays published until the new one replaces it.
    pub async fn set_orientation(self: &Arc<Self>, reversed: bool) -> u64 {
        let generation = {
            let mut state = self.state.lock().await;
            state.reversed = reversed;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        tracing::debug!(session = %self.id, generation, reversed, "Orientation requested");
        self.spawn_run(generation, self.debounce);
        generation
    }

    pub async fn reversed(&self) -> bool {
        self.state.lock().await.reversed
    }

    /// Invalidate in-flight runs and release the published result
    pub fn close(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.published.send_replace(Published {
            generation,
            output: SessionOutput::Pending,
        });
        tracing::debug!(session = %self.id, "Session closed");
    }

    /// The published output, if it belongs to the current generation and
    /// is finished
    pub fn current(&self) -> Option<SessionOutput> {
        let published = self.published.borrow();
        (published.generation == self.generation() && !published.output.is_pending())
            .then(|| published.output.clone())
    }

    /// Wait up to `timeout` for the current generation's output
    pub async fn wait_current(&self, timeout: Duration) -> Option<SessionOutput> {
        let mut rx = self.published.subscribe();
        let waited = tokio::time::timeout(
            timeout,
            rx.wait_for(|p| p.generation == self.generation() && !p.output.is_pending()),
        )
        .await;

        match waited {
            Ok(Ok(published)) => Some(published.output.clone()),
            _ => None,
        }
    }

    pub async fn info(&self) -> SessionInfo {
        let (filename, reversed) = {
            let state = self.state.lock().await;
            (state.source.export_filename(), state.reversed)
        };

        let (status, ready, error) = match self.current() {
            None | Some(SessionOutput::Pending) => (SessionStatus::Pending, None, None),
            Some(SessionOutput::Ready(image)) => (SessionStatus::Ready, Some(image), None),
            Some(SessionOutput::Failed(failure)) => (SessionStatus::Failed, None, Some(failure)),
        };
        let dimensions = ready.as_ref().map(|image| image.dimensions);

        SessionInfo {
            id: self.id.to_string(),
            generation: self.generation(),
            reversed,
            status,
            filename,
            width: dimensions.map(|d| d.width),
            height: dimensions.map(|d| d.height),
            error,
            completed_at: ready.map(|image| image.completed_at.to_rfc3339()),
            runs: self.run_count(),
            created_at: self.created_at.to_rfc3339(),
        }
    }

    fn spawn_run(self: &Arc<Self>, generation: u64, delay: Duration) {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.run(generation, delay).await });
    }

    async fn run(&self, generation: u64, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let Some((source, reversed)) = self.claim(generation).await else {
            return;
        };
        let output = self.execute(source, reversed).await;
        self.finish(generation, output);
    }

    /// Snapshot the inputs for `generation`, or `None` if it was superseded
    /// while waiting.
    async fn claim(&self, generation: u64) -> Option<(Upload, bool)> {
        let state = self.state.lock().await;
        if self.generation() != generation {
            tracing::debug!(session = %self.id, generation, "Skipping superseded run");
            return None;
        }
        self.runs.fetch_add(1, Ordering::SeqCst);
        Some((state.source.clone(), state.reversed))
    }

    async fn execute(&self, source: Upload, reversed: bool) -> SessionOutput {
        match self.processor.process(source, reversed).await {
            Ok(image) => SessionOutput::Ready(Arc::new(image)),
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "Processing failed");
                SessionOutput::Failed(RunFailure::from(&e))
            }
        }
    }

    /// Publish a finished run. Returns false if a newer request arrived
    /// while it was processing.
    fn finish(&self, generation: u64, output: SessionOutput) -> bool {
        if self.generation() != generation {
            tracing::debug!(session = %self.id, generation, "Discarding stale result");
            return false;
        }
        self.publish(generation, output);
        true
    }

    /// Publish an output unless a newer generation has already published
    fn publish(&self, generation: u64, output: SessionOutput) {
        self.published.send_if_modified(move |current| {
            if generation < current.generation {
                return false;
            }
            *current = Published { generation, output };
            true
        });
    }
}
