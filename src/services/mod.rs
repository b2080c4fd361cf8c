pub mod processor;
pub mod session;
pub mod session_store;
pub mod validation;

pub use processor::ProcessingService;
pub use session::{
    Published, RunFailure, Session, SessionInfo, SessionOutput, SessionStatus,
};
pub use session_store::{InMemorySessionStore, SessionStore};
pub use validation::validate_upload;
