use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlSslMode},
    MySql, Pool,
};

use super::StoreResult;
use crate::config::MySqlConfig;

const CREATE_TABLES: [&str; 7] = [
    r#"CREATE TABLE IF NOT EXISTS users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(255) UNIQUE NOT NULL,
        password VARCHAR(255) NOT NULL,
        fullName VARCHAR(255) NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS tasks (
        id INT AUTO_INCREMENT PRIMARY KEY,
        user_id INT,
        text VARCHAR(255),
        is_done BOOLEAN NOT NULL DEFAULT FALSE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS chat (
        id INT AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(255),
        message TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS homework (
        id INT AUTO_INCREMENT PRIMARY KEY,
        subject VARCHAR(255),
        task TEXT,
        deadline DATE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS news (
        id INT AUTO_INCREMENT PRIMARY KEY,
        title VARCHAR(255),
        content TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS events (
        id INT AUTO_INCREMENT PRIMARY KEY,
        title VARCHAR(255),
        event_date DATETIME,
        location VARCHAR(255)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS feedback (
        id INT AUTO_INCREMENT PRIMARY KEY,
        category VARCHAR(50),
        subject VARCHAR(255),
        message TEXT
    )"#,
];

/// Default maximum connections for the pool.
const MAX_CONNECTIONS: u32 = 10;

/// MySQL-backed store, the production backend.
pub struct MySqlStore {
    db: Pool<MySql>,
}

impl MySqlStore {
    /// Connect using the discrete `DB_*` settings. The link is encrypted but
    /// the server certificate is not verified.
    pub async fn connect(config: &MySqlConfig) -> StoreResult<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .ssl_mode(MySqlSslMode::Required);

        let db = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        Ok(Self { db })
    }

    /// Connect from a `mysql://` URL, leaving TLS to the URL's `ssl-mode`.
    #[cfg(test)]
    pub(crate) async fn connect_url(url: &str) -> StoreResult<Self> {
        let db = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await?;
        Ok(Self { db })
    }
}

// FOREIGN_KEY_CHECKS is a session variable, hence the single connection in
// `clear_database`.
impl_store!(
    MySqlStore,
    MySql,
    create_tables: CREATE_TABLES,
    integrity_off: "SET FOREIGN_KEY_CHECKS = 0",
    integrity_on: "SET FOREIGN_KEY_CHECKS = 1",
    insert_id: |result| result.last_insert_id() as i64,
);
