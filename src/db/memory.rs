use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{Coordinates, SessionState, UnknownState};
use super::{LocationStore, SessionStore, StorageError};

/// In-process store backing controller and router tests.
///
/// Sessions are kept as their stored text so a corrupt row can be planted.
#[derive(Default)]
pub struct MemoryStore {
    locations: RwLock<HashMap<i64, Coordinates>>,
    sessions: RwLock<HashMap<i64, String>>,
    fail_location_writes: AtomicBool,
    fail_session_reads: AtomicBool,
    fail_session_writes: AtomicBool,
}

fn unavailable() -> StorageError {
    StorageError::Database(sqlx::Error::PoolTimedOut)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent location upsert fail as if the database went away.
    pub fn fail_location_writes(&self) {
        self.fail_location_writes.store(true, Ordering::SeqCst);
    }

    pub fn fail_session_reads(&self) {
        self.fail_session_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_session_writes(&self) {
        self.fail_session_writes.store(true, Ordering::SeqCst);
    }

    pub async fn plant_raw_session(&self, user_id: i64, raw: &str) {
        self.sessions.write().await.insert(user_id, raw.to_string());
    }

    pub async fn location_count(&self) -> usize {
        self.locations.read().await.len()
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn get(&self, user_id: i64) -> Result<Option<Coordinates>, StorageError> {
        Ok(self.locations.read().await.get(&user_id).copied())
    }

    async fn upsert(&self, user_id: i64, location: Coordinates) -> Result<(), StorageError> {
        if self.fail_location_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.locations.write().await.insert(user_id, location);
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load_state(&self, user_id: i64) -> Result<SessionState, StorageError> {
        if self.fail_session_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        match self.sessions.read().await.get(&user_id) {
            Some(raw) => raw
                .parse()
                .map_err(|UnknownState(state)| StorageError::CorruptSession(state)),
            None => Ok(SessionState::Idle),
        }
    }

    async fn save_state(&self, user_id: i64, state: SessionState) -> Result<(), StorageError> {
        if self.fail_session_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.sessions
            .write()
            .await
            .insert(user_id, state.as_str().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_last_written_pair() {
        let store = MemoryStore::new();
        store.upsert(7, Coordinates::new(55.75, 37.62)).await.unwrap();
        store.upsert(7, Coordinates::new(-0.5, -78.25)).await.unwrap();

        assert_eq!(
            store.get(7).await.unwrap(),
            Some(Coordinates::new(-0.5, -78.25))
        );
        assert_eq!(store.location_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(42).await.unwrap().is_none());
        assert_eq!(store.load_state(42).await.unwrap(), SessionState::Idle);
    }

    #[tokio::test]
    async fn planted_garbage_reads_as_corrupt() {
        let store = MemoryStore::new();
        store.plant_raw_session(5, "waiting").await;

        assert!(matches!(
            store.load_state(5).await,
            Err(StorageError::CorruptSession(state)) if state == "waiting"
        ));

        store
            .save_state(5, SessionState::AwaitingLocation)
            .await
            .unwrap();
        assert_eq!(
            store.load_state(5).await.unwrap(),
            SessionState::AwaitingLocation
        );
    }
}
