pub mod models;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use models::{Coordinates, SessionState, UnknownState};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unknown dialogue state stored: {0}")]
    CorruptSession(String),
}

/// One location per user; writes overwrite, never append.
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn get(&self, user_id: i64) -> Result<Option<Coordinates>, StorageError>;

    async fn upsert(&self, user_id: i64, location: Coordinates) -> Result<(), StorageError>;
}

/// Per-user dialogue state that survives restarts. A user with no record is `Idle`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_state(&self, user_id: i64) -> Result<SessionState, StorageError>;

    async fn save_state(&self, user_id: i64, state: SessionState) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        // Postgres doesn't allow multiple commands in a single prepared statement.

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS user_locations (
                user_id BIGINT PRIMARY KEY,
                latitude DOUBLE PRECISION NOT NULL,
                longitude DOUBLE PRECISION NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS dialogue_sessions (
                user_id BIGINT PRIMARY KEY,
                state TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_user_location(
        &self,
        user_id: i64,
    ) -> Result<Option<Coordinates>, StorageError> {
        let location = sqlx::query_as::<_, Coordinates>(
            "SELECT latitude, longitude FROM user_locations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(location)
    }

    pub async fn get_session_state(&self, user_id: i64) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT state FROM dialogue_sessions WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(state,)| state))
    }
}

#[async_trait]
impl LocationStore for Database {
    async fn get(&self, user_id: i64) -> Result<Option<Coordinates>, StorageError> {
        self.get_user_location(user_id).await
    }

    async fn upsert(&self, user_id: i64, location: Coordinates) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO user_locations (user_id, latitude, longitude)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(location.latitude)
        .bind(location.longitude)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn load_state(&self, user_id: i64) -> Result<SessionState, StorageError> {
        match self.get_session_state(user_id).await? {
            Some(state) => state
                .parse()
                .map_err(|UnknownState(state)| StorageError::CorruptSession(state)),
            None => Ok(SessionState::Idle),
        }
    }

    async fn save_state(&self, user_id: i64, state: SessionState) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO dialogue_sessions (user_id, state)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET state = EXCLUDED.state, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(state.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
