use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use std::time::Duration;
use tracing::info;

/// One persisted room document
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CodeRoomRow {
    pub room_id: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database-backed document store: one row per room, last write wins.
pub struct CodeStore {
    pool: PgPool,
}

impl CodeStore {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    ///
    /// # Returns
    /// * `Result<Self, SqlxError>` - Document store or error
    pub async fn new(database_url: &str) -> Result<Self, SqlxError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600)) // Close idle connections after 10 minutes
            .max_lifetime(Duration::from_secs(1800)) // Recycle connections after 30 minutes
            .connect(database_url)
            .await?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Create the code_rooms table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS code_rooms (
                room_id TEXT PRIMARY KEY,
                code TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database schema ensured");
        Ok(())
    }

    /// Latest persisted text for a room
    ///
    /// # Arguments
    /// * `room_id` - Room identifier
    ///
    /// # Returns
    /// * `Result<Option<String>, SqlxError>` - The text, or None if the room was never created
    pub async fn get_code(&self, room_id: &str) -> Result<Option<String>, SqlxError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT code FROM code_rooms WHERE room_id = $1")
                .bind(room_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(code,)| code))
    }

    /// Full row for a room, used by the download endpoint.
    pub async fn get_room(&self, room_id: &str) -> Result<Option<CodeRoomRow>, SqlxError> {
        sqlx::query_as::<_, CodeRoomRow>(
            "SELECT room_id, code, created_at, updated_at FROM code_rooms WHERE room_id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a new room record. A no-op when the room already exists: the
    /// primary key on room_id makes racing lazy creations idempotent.
    pub async fn create_room(&self, room_id: &str, code: &str) -> Result<(), SqlxError> {
        let result = sqlx::query(
            "INSERT INTO code_rooms (room_id, code) VALUES ($1, $2) ON CONFLICT (room_id) DO NOTHING",
        )
        .bind(room_id)
        .bind(code)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            info!("Room '{}' created", room_id);
        }
        Ok(())
    }

    /// Create-or-replace the stored text for a room. Last write wins.
    pub async fn upsert_code(&self, room_id: &str, code: &str) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            INSERT INTO code_rooms (room_id, code) VALUES ($1, $2)
            ON CONFLICT (room_id) DO UPDATE
            SET code = EXCLUDED.code,
                updated_at = NOW();
            "#,
        )
        .bind(room_id)
        .bind(code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
