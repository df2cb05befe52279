use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::WorkoutSession;
use crate::error::{AppError, Result};
use crate::models::WorkoutWithBlocks;

/// One live session. The lock is held across repository writes so actions
/// on the same session run one at a time.
pub type SharedSession = Arc<Mutex<WorkoutSession>>;

/// Live sessions keyed by session id, owned by the application state.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for a loaded workout definition.
    pub async fn open(
        &self,
        user_id: &str,
        definition: WorkoutWithBlocks,
    ) -> Result<(String, SharedSession)> {
        let id = Uuid::new_v4().to_string();
        let session = WorkoutSession::new(id.clone(), user_id.to_string(), definition)?;
        let shared = Arc::new(Mutex::new(session));

        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::clone(&shared));
        tracing::info!("Opened session {} for user {}", id, user_id);

        Ok((id, shared))
    }

    pub async fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn require(&self, id: &str) -> Result<SharedSession> {
        self.get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))
    }

    pub async fn remove(&self, id: &str) -> Option<SharedSession> {
        self.sessions.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
