use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::agent::types::Content;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A durable handle grouping the messages of one (app, user) conversation
/// thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub app_name: String,
    pub user_id: String,
    #[serde(default)]
    pub history: Vec<Content>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        app_name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persistence contract for conversation sessions.
///
/// Implementations must be safe for concurrent use; same-key create/get/
/// delete races are serialized by the implementation.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create a session under the caller-supplied id. If the key already
    /// exists the stored session is returned unchanged; the supplied id is
    /// never replaced.
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Session>;

    /// Fetch a session, `None` if the key is unknown. A missing session is
    /// not an error at this layer; callers decide.
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<Session>>;

    /// All sessions for a user. Order is store-defined and not stable.
    async fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>>;

    /// Idempotent delete: succeeds whether or not the session exists.
    async fn delete_session(&self, app_name: &str, user_id: &str, session_id: &str) -> Result<()>;

    /// Append turn contents to a session's history, in order.
    async fn append_history(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        contents: Vec<Content>,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    app_name: String,
    user_id: String,
    session_id: String,
}

impl SessionKey {
    fn new(app_name: &str, user_id: &str, session_id: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
        }
    }
}

/// In-memory session store. The `RwLock` serializes concurrent mutations on
/// the same key; contents are lost on process exit.
#[derive(Default)]
pub struct InMemorySessionService {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(SessionKey::new(app_name, user_id, session_id))
            .or_insert_with(|| Session::new(session_id, app_name, user_id));
        Ok(session.clone())
    }

    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&SessionKey::new(app_name, user_id, session_id))
            .cloned())
    }

    async fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.app_name == app_name && s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_session(&self, app_name: &str, user_id: &str, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&SessionKey::new(app_name, user_id, session_id));
        Ok(())
    }

    async fn append_history(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        contents: Vec<Content>,
    ) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&SessionKey::new(app_name, user_id, session_id))
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        session.history.extend(contents);
        session.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::APP_NAME;

    #[tokio::test]
    async fn create_honors_caller_supplied_id() {
        let store = InMemorySessionService::new();
        let id = uuid::Uuid::new_v4().to_string();

        let session = store.create_session(APP_NAME, "alice", &id).await.unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.app_name, APP_NAME);
        assert_eq!(session.user_id, "alice");
    }

    #[tokio::test]
    async fn create_on_existing_key_returns_stored_session() {
        let store = InMemorySessionService::new();
        store.create_session(APP_NAME, "alice", "s1").await.unwrap();
        store
            .append_history(APP_NAME, "alice", "s1", vec![Content::user("hi")])
            .await
            .unwrap();

        let session = store.create_session(APP_NAME, "alice", "s1").await.unwrap();
        assert_eq!(session.history.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_session_is_none_not_error() {
        let store = InMemorySessionService::new();
        let found = store.get_session(APP_NAME, "alice", "nope").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn list_is_scoped_to_app_and_user() {
        let store = InMemorySessionService::new();
        store.create_session(APP_NAME, "alice", "a1").await.unwrap();
        store.create_session(APP_NAME, "alice", "a2").await.unwrap();
        store.create_session(APP_NAME, "bob", "b1").await.unwrap();
        store
            .create_session("other_app", "alice", "x1")
            .await
            .unwrap();

        let mut ids: Vec<String> = store
            .list_sessions(APP_NAME, "alice")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemorySessionService::new();
        store.create_session(APP_NAME, "alice", "s1").await.unwrap();

        store.delete_session(APP_NAME, "alice", "s1").await.unwrap();
        store.delete_session(APP_NAME, "alice", "s1").await.unwrap();

        assert!(store
            .get_session(APP_NAME, "alice", "s1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn append_history_preserves_order_and_requires_session() {
        let store = InMemorySessionService::new();
        store.create_session(APP_NAME, "alice", "s1").await.unwrap();

        store
            .append_history(
                APP_NAME,
                "alice",
                "s1",
                vec![Content::user("q"), Content::model("a")],
            )
            .await
            .unwrap();

        let session = store
            .get_session(APP_NAME, "alice", "s1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.history[0], Content::user("q"));
        assert_eq!(session.history[1], Content::model("a"));
        assert!(session.updated_at >= session.created_at);

        let err = store
            .append_history(APP_NAME, "alice", "gone", vec![Content::user("q")])
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }
}
