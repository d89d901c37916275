use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::Session;

/// Sessions untouched for this long are dropped on the next `create`.
pub const DEFAULT_SESSION_IDLE_MINUTES: i64 = 120;

/// In-memory session map. Sessions never share state with each other.
///
/// The lock is only held while reading or writing fields; callers must not
/// await network work inside `with_session`.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_SESSION_IDLE_MINUTES))
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Sweeps idle sessions, then inserts a fresh one.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.lock().await;

        let cutoff = Utc::now() - self.idle_ttl;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active > cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }

        sessions.insert(id, Session::new());
        info!("Created session {id}");
        id
    }

    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        session.last_active = Utc::now();
        Ok(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .lock()
            .await
            .remove(&id)
            .map(|_| info!("Removed session {id}"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
