//! Session-keyed step continuity owned by the transport layer.
//!
//! Clients that keep their own centroids never touch this store. Clients that
//! send a `session` id get their last centroids and iteration remembered, so a
//! follow-up step may omit `prev_centers` and `current_iter`. Sessions never
//! share state with each other and the engine never sees the store.

use std::collections::HashMap;

use kmeans::Point;
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub centroids: Vec<Point>,
    /// Iteration index of the last completed step
    pub iteration: usize,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<SessionState> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn record(&self, id: &str, centroids: Vec<Point>, iteration: usize) {
        self.sessions.write().await.insert(id.to_string(), SessionState { centroids, iteration });
    }

    /// Read-modify-write of one session under a single write guard, so
    /// concurrent steps on the same id are applied one after the other.
    /// Nothing is stored when `f` fails.
    pub async fn update<T, E, F>(&self, id: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(Option<&SessionState>) -> Result<(SessionState, T), E>,
    {
        let mut sessions = self.sessions.write().await;
        let (state, out) = f(sessions.get(id))?;
        sessions.insert(id.to_string(), state);
        Ok(out)
    }

    /// Forget one session. Returns whether anything was stored for it.
    pub async fn reset(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
