use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::interview::session::InterviewSession;

struct Entry {
    session: Arc<Mutex<InterviewSession>>,
    last_active: Instant,
}

/// Process-local session registry. Nothing is persisted.
///
/// Each session sits behind its own mutex so a turn runs to completion before the next
/// one for the same session starts, while other sessions proceed independently.
/// Lookups refresh a session's idle clock; `evict_idle` drops the stale ones.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: InterviewSession) -> Uuid {
        let id = session.id;
        let entry = Entry {
            session: Arc::new(Mutex::new(session)),
            last_active: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<InterviewSession>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_active = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session not looked up within `idle`. Returns how many were dropped.
    /// A session whose turn is still running is kept.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.duration_since(entry.last_active) < idle || entry.session.try_lock().is_err()
        });
        before - sessions.len()
    }

    /// Runs `evict_idle` on a fixed period for the life of the process.
    pub fn spawn_eviction(&self, idle: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let period = (idle / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(idle).await;
                if evicted > 0 {
                    info!(evicted, "Idle sessions evicted");
                }
            }
        })
    }
}
