use crate::models::SessionId;
use crate::services::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for live session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a session, returning the ids of any sessions evicted to make room
    async fn insert(&self, session: Arc<Session>) -> Vec<SessionId>;

    /// Find a session by ID
    async fn get(&self, id: &SessionId) -> Option<Arc<Session>>;

    /// Remove a session and release its result
    async fn remove(&self, id: &SessionId) -> Option<Arc<Session>>;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// In-memory session storage with a capacity bound.
///
/// When full, the oldest session is evicted.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Session>>>>,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Arc<Session>) -> Vec<SessionId> {
        let mut sessions = self.sessions.write().await;
        let mut evicted = Vec::new();

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.created_at())
                .map(|s| s.id().clone())
            else {
                break;
            };
            if let Some(old) = sessions.remove(&oldest) {
                old.close();
            }
            tracing::info!(session = %oldest, "Evicted oldest session");
            evicted.push(oldest);
        }

        sessions.insert(session.id().clone(), session);
        evicted
    }

    async fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }

    async fn remove(&self, id: &SessionId) -> Option<Arc<Session>> {
        let removed = self.sessions.write().await.remove(id);
        if let Some(session) = &removed {
            session.close();
        }
        removed
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppConfig, Upload};
    use crate::services::ProcessingService;
    use axum::body::Bytes;
    use std::time::Duration;

    fn new_session() -> Arc<Session> {
        let processor = Arc::new(ProcessingService::new(Arc::new(AppConfig::default())));
        Session::new(
            SessionId::generate(),
            Upload::new(Bytes::from_static(b"\x89PNG\r\n\x1a\n")),
            processor,
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemorySessionStore::new(4);
        let session = new_session();
        let id = session.id().clone();

        assert!(store.insert(session).await.is_empty());
        let found = store.get(&id).await;

        assert!(found.is_some());
        assert_eq!(found.unwrap().id(), &id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown() {
        let store = InMemorySessionStore::new(4);
        assert!(store.get(&SessionId::new("missing")).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_closes_session() {
        let store = InMemorySessionStore::new(4);
        let session = new_session();
        let id = session.id().clone();
        store.insert(session.clone()).await;

        let removed = store.remove(&id).await.unwrap();
        assert_eq!(removed.generation(), 2);
        assert!(store.get(&id).await.is_none());
        assert!(store.remove(&id).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_evicts_oldest_when_full() {
        let store = InMemorySessionStore::new(2);
        let first = new_session();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = new_session();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let third = new_session();

        store.insert(first.clone()).await;
        store.insert(second.clone()).await;
        let evicted = store.insert(third.clone()).await;

        assert_eq!(evicted, vec![first.id().clone()]);
        assert_eq!(store.len().await, 2);
        assert!(store.get(second.id()).await.is_some());
        assert!(store.get(third.id()).await.is_some());
    }
}
