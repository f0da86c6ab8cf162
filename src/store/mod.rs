//! Persistence for every resource the server exposes.
//!
//! Handlers only see the [`Store`] trait; the concrete backend is chosen at
//! startup from the environment and injected through the router state.

// Expands to the `Store` impl for a backend. Every DML statement is shared;
// a backend only supplies its DDL, its integrity-check switch and how it
// reports the id of the last insert.
macro_rules! impl_store {
    (
        $store:ty,
        $db:ty,
        create_tables: $create_tables:expr,
        integrity_off: $integrity_off:expr,
        integrity_on: $integrity_on:expr,
        insert_id: |$result:ident| $insert_id:expr $(,)?
    ) => {
        #[::async_trait::async_trait]
        impl $crate::store::Store for $store {
            async fn init_schema(&self) -> Vec<&'static str> {
                let mut failed = Vec::new();
                for (table, ddl) in $crate::store::TABLES.iter().zip($create_tables) {
                    if let Err(e) = ::sqlx::query(ddl).execute(&self.db).await {
                        ::tracing::error!(table = %table, "failed to create table: {}", e);
                        failed.push(*table);
                    }
                }
                ::tracing::info!("tables checked/created");
                failed
            }

            async fn create_user(
                &self,
                username: &str,
                password: &str,
                full_name: &str,
            ) -> $crate::store::StoreResult<()> {
                ::sqlx::query($crate::store::sql::INSERT_USER)
                    .bind(username)
                    .bind(password)
                    .bind(full_name)
                    .execute(&self.db)
                    .await?;
                Ok(())
            }

            async fn find_user_by_credentials(
                &self,
                username: Option<&str>,
                password: Option<&str>,
            ) -> $crate::store::StoreResult<Option<$crate::model::User>> {
                let user = ::sqlx::query_as::<$db, $crate::model::User>($crate::store::sql::FIND_USER)
                    .bind(username)
                    .bind(password)
                    .fetch_optional(&self.db)
                    .await?;
                Ok(user)
            }

            async fn list_users(
                &self,
            ) -> $crate::store::StoreResult<Vec<$crate::model::UserSummary>> {
                Ok(::sqlx::query_as::<$db, $crate::model::UserSummary>($crate::store::sql::LIST_USERS)
                    .fetch_all(&self.db)
                    .await?)
            }

            async fn list_tasks(
                &self,
                user_id: Option<i64>,
            ) -> $crate::store::StoreResult<Vec<$crate::model::Task>> {
                Ok(::sqlx::query_as::<$db, $crate::model::Task>($crate::store::sql::LIST_TASKS)
                    .bind(user_id)
                    .fetch_all(&self.db)
                    .await?)
            }

            async fn create_task(
                &self,
                user_id: Option<i64>,
                text: Option<&str>,
            ) -> $crate::store::StoreResult<$crate::model::CreatedTask> {
                let $result = ::sqlx::query($crate::store::sql::INSERT_TASK)
                    .bind(user_id)
                    .bind(text)
                    .execute(&self.db)
                    .await?;
                Ok($crate::model::CreatedTask {
                    id: $insert_id,
                    text: text.map(str::to_owned),
                    is_done: false,
                })
            }

            async fn toggle_task(&self, id: i64) -> $crate::store::StoreResult<u64> {
                let result = ::sqlx::query($crate::store::sql::TOGGLE_TASK)
                    .bind(id)
                    .execute(&self.db)
                    .await?;
                Ok(result.rows_affected())
            }

            async fn delete_task(&self, id: i64) -> $crate::store::StoreResult<u64> {
                let result = ::sqlx::query($crate::store::sql::DELETE_TASK)
                    .bind(id)
                    .execute(&self.db)
                    .await?;
                Ok(result.rows_affected())
            }

            async fn list_chat(
                &self,
            ) -> $crate::store::StoreResult<Vec<$crate::model::ChatMessage>> {
                Ok(::sqlx::query_as::<$db, $crate::model::ChatMessage>($crate::store::sql::LIST_CHAT)
                    .fetch_all(&self.db)
                    .await?)
            }

            async fn create_chat_message(
                &self,
                username: Option<&str>,
                message: Option<&str>,
            ) -> $crate::store::StoreResult<()> {
                ::sqlx::query($crate::store::sql::INSERT_CHAT)
                    .bind(username)
                    .bind(message)
                    .execute(&self.db)
                    .await?;
                Ok(())
            }

            async fn list_board(
                &self,
                board: $crate::model::Board,
            ) -> $crate::store::StoreResult<$crate::model::BoardItems> {
                use $crate::model::{Board, BoardItems};

                let sql = board.list_sql();
                let items = match board {
                    Board::Homework => BoardItems::Homework(
                        ::sqlx::query_as::<$db, $crate::model::HomeworkItem>(sql)
                            .fetch_all(&self.db)
                            .await?,
                    ),
                    Board::News => BoardItems::News(
                        ::sqlx::query_as::<$db, $crate::model::NewsItem>(sql)
                            .fetch_all(&self.db)
                            .await?,
                    ),
                    Board::Events => BoardItems::Events(
                        ::sqlx::query_as::<$db, $crate::model::Event>(sql)
                            .fetch_all(&self.db)
                            .await?,
                    ),
                    Board::Feedback => BoardItems::Feedback(
                        ::sqlx::query_as::<$db, $crate::model::FeedbackItem>(sql)
                            .fetch_all(&self.db)
                            .await?,
                    ),
                };
                Ok(items)
            }

            async fn create_board_item(
                &self,
                post: &$crate::schema::BoardPost,
            ) -> $crate::store::StoreResult<()> {
                use $crate::schema::BoardPost;
                use $crate::store::sql;

                let statement = match post {
                    BoardPost::Homework(item) => ::sqlx::query(sql::INSERT_HOMEWORK)
                        .bind(item.subject.as_deref())
                        .bind(item.task.as_deref())
                        .bind(item.deadline),
                    BoardPost::News(item) => ::sqlx::query(sql::INSERT_NEWS)
                        .bind(item.title.as_deref())
                        .bind(item.content.as_deref()),
                    BoardPost::Events(item) => ::sqlx::query(sql::INSERT_EVENT)
                        .bind(item.title.as_deref())
                        .bind(item.event_date)
                        .bind(item.location.as_deref()),
                    BoardPost::Feedback(item) => ::sqlx::query(sql::INSERT_FEEDBACK)
                        .bind(item.category.as_deref())
                        .bind(item.subject.as_deref())
                        .bind(item.message.as_deref()),
                };
                statement.execute(&self.db).await?;
                Ok(())
            }

            async fn clear_database(&self) -> $crate::store::StoreResult<Vec<&'static str>> {
                let mut failed = Vec::new();
                {
                    // The integrity switch is per session, so every drop runs on this connection
                    let mut conn = self.db.acquire().await?;
                    ::sqlx::query($integrity_off).execute(&mut *conn).await?;
                    for (table, drop) in $crate::store::TABLES
                        .iter()
                        .zip($crate::store::sql::DROP_TABLES)
                    {
                        if let Err(e) = ::sqlx::query(drop).execute(&mut *conn).await {
                            ::tracing::error!(table = %table, "failed to drop table: {}", e);
                            failed.push(*table);
                        }
                    }
                    ::sqlx::query($integrity_on).execute(&mut *conn).await?;
                }
                ::tracing::info!("database cleared");

                for table in $crate::store::Store::init_schema(self).await {
                    if !failed.contains(&table) {
                        failed.push(table);
                    }
                }
                Ok(failed)
            }
        }
    };
}

mod mysql;
mod sqlite;

#[cfg(test)]
mod checks;

pub use mysql::MySqlStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Board, BoardItems, ChatMessage, CreatedTask, Task, User, UserSummary};
use crate::schema::BoardPost;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Every table the schema initializer owns, in creation order.
pub const TABLES: [&str; 7] = ["users", "tasks", "chat", "homework", "news", "events", "feedback"];

/// Single-statement operations over the relational store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create any missing table. Each table is attempted independently; the
    /// names of tables whose statement failed are returned.
    async fn init_schema(&self) -> Vec<&'static str>;

    async fn create_user(&self, username: &str, password: &str, full_name: &str) -> StoreResult<()>;

    /// First user whose username and password both match exactly.
    async fn find_user_by_credentials(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> StoreResult<Option<User>>;

    async fn list_users(&self) -> StoreResult<Vec<UserSummary>>;

    async fn list_tasks(&self, user_id: Option<i64>) -> StoreResult<Vec<Task>>;

    async fn create_task(&self, user_id: Option<i64>, text: Option<&str>) -> StoreResult<CreatedTask>;

    /// Flip `is_done`. Returns the number of rows touched.
    async fn toggle_task(&self, id: i64) -> StoreResult<u64>;

    async fn delete_task(&self, id: i64) -> StoreResult<u64>;

    async fn list_chat(&self) -> StoreResult<Vec<ChatMessage>>;

    async fn create_chat_message(&self, username: Option<&str>, message: Option<&str>) -> StoreResult<()>;

    async fn list_board(&self, board: Board) -> StoreResult<BoardItems>;

    async fn create_board_item(&self, post: &BoardPost) -> StoreResult<()>;

    /// Drop every table and rebuild the schema. Returns the tables whose
    /// drop or re-creation failed.
    async fn clear_database(&self) -> StoreResult<Vec<&'static str>>;
}

// DML shared by both dialects; `?` placeholders work for MySQL and SQLite alike.
pub(crate) mod sql {
    pub const INSERT_USER: &str = "INSERT INTO users (username, password, fullName) VALUES (?, ?, ?)";
    pub const FIND_USER: &str =
        "SELECT id, username, password, fullName FROM users WHERE username = ? AND password = ? LIMIT 1";
    pub const LIST_USERS: &str = "SELECT id, fullName, username FROM users ORDER BY fullName ASC";

    pub const LIST_TASKS: &str =
        "SELECT id, user_id, text, is_done FROM tasks WHERE user_id = ? ORDER BY id DESC";
    pub const INSERT_TASK: &str = "INSERT INTO tasks (user_id, text) VALUES (?, ?)";
    pub const TOGGLE_TASK: &str = "UPDATE tasks SET is_done = NOT is_done WHERE id = ?";
    pub const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?";

    // Newest 50 by creation order, handed back oldest first
    pub const LIST_CHAT: &str = "SELECT id, username, message, created_at FROM (\
        SELECT id, username, message, created_at FROM chat \
        ORDER BY created_at DESC, id DESC LIMIT 50\
        ) AS recent ORDER BY created_at ASC, id ASC";
    pub const INSERT_CHAT: &str = "INSERT INTO chat (username, message) VALUES (?, ?)";

    pub const INSERT_HOMEWORK: &str = "INSERT INTO homework (subject, task, deadline) VALUES (?, ?, ?)";
    pub const INSERT_NEWS: &str = "INSERT INTO news (title, content) VALUES (?, ?)";
    pub const INSERT_EVENT: &str = "INSERT INTO events (title, event_date, location) VALUES (?, ?, ?)";
    pub const INSERT_FEEDBACK: &str =
        "INSERT INTO feedback (category, subject, message) VALUES (?, ?, ?)";

    pub const DROP_TABLES: [&str; 7] = [
        "DROP TABLE IF EXISTS users",
        "DROP TABLE IF EXISTS tasks",
        "DROP TABLE IF EXISTS chat",
        "DROP TABLE IF EXISTS homework",
        "DROP TABLE IF EXISTS news",
        "DROP TABLE IF EXISTS events",
        "DROP TABLE IF EXISTS feedback",
    ];
}
