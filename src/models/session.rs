use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a session id with 96 bits of entropy (24 hex chars)
    pub fn generate() -> Self {
        use rand::Rng;
        let bytes: [u8; 12] = rand::thread_rng().gen();
        Self(hex::encode(bytes))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
