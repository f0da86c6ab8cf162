use std::time::Duration;

use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::{info, warn};

use super::StoreResult;

const CREATE_TABLES: [&str; 7] = [
    r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username VARCHAR(255) UNIQUE NOT NULL,
        password VARCHAR(255) NOT NULL,
        fullName VARCHAR(255) NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        text VARCHAR(255),
        is_done BOOLEAN NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS chat (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username VARCHAR(255),
        message TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS homework (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        subject VARCHAR(255),
        task TEXT,
        deadline DATE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS news (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(255),
        content TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(255),
        event_date DATETIME,
        location VARCHAR(255)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS feedback (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category VARCHAR(50),
        subject VARCHAR(255),
        message TEXT
    )"#,
];

/// SQLite-backed store, used for local development and tests.
pub struct SqliteStore {
    db: Pool<Sqlite>,
}

/// Whether `url` names an in-memory database rather than a file.
fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl SqliteStore {
    /// Open (creating if needed) the database behind `url`. In-memory URLs
    /// get a single-connection pool.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        if is_memory_url(url) {
            warn!("using an in-memory database, nothing will persist");
            return Self::single_connection(url).await;
        }

        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("creating database {}", url);
            Sqlite::create_database(url).await?;
        }

        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self { db })
    }

    /// A private in-memory database.
    #[cfg(test)]
    pub(crate) async fn in_memory() -> StoreResult<Self> {
        Self::single_connection("sqlite::memory:").await
    }

    // Every SQLite memory connection is its own database, so the pool keeps
    // exactly one connection open for its whole life.
    async fn single_connection(url: &str) -> StoreResult<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect(url)
            .await?;
        Ok(Self { db })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.db
    }
}

impl_store!(
    SqliteStore,
    Sqlite,
    create_tables: CREATE_TABLES,
    integrity_off: "PRAGMA foreign_keys = OFF",
    integrity_on: "PRAGMA foreign_keys = ON",
    insert_id: |result| result.last_insert_rowid(),
);
