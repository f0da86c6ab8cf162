use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};

// Full user row, as returned by login
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) password: String,
    #[serde(rename = "fullName")]
    #[sqlx(rename = "fullName")]
    pub(crate) full_name: String,
}

// Public projection of a user; there is no password field to leak
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct UserSummary {
    pub(crate) id: i64,
    #[serde(rename = "fullName")]
    #[sqlx(rename = "fullName")]
    pub(crate) full_name: String,
    pub(crate) username: String,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Task {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) text: Option<String>,
    #[serde(serialize_with = "bool_as_int")]
    pub(crate) is_done: bool,
}

// Echo returned after a task insert
#[derive(Debug, Clone, serde::Serialize)]
pub struct CreatedTask {
    pub(crate) id: i64,
    pub(crate) text: Option<String>,
    #[serde(serialize_with = "bool_as_int")]
    pub(crate) is_done: bool,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ChatMessage {
    pub(crate) id: i64,
    pub(crate) username: Option<String>,
    pub(crate) message: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct HomeworkItem {
    pub(crate) id: i64,
    pub(crate) subject: Option<String>,
    pub(crate) task: Option<String>,
    pub(crate) deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct NewsItem {
    pub(crate) id: i64,
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Event {
    pub(crate) id: i64,
    pub(crate) title: Option<String>,
    pub(crate) event_date: Option<NaiveDateTime>,
    pub(crate) location: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct FeedbackItem {
    pub(crate) id: i64,
    pub(crate) category: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) message: Option<String>,
}

/// The announcement lists exposed through the generic board routes.
///
/// Each variant owns a fixed SQL string; table names are never composed
/// from request data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Homework,
    News,
    Events,
    Feedback,
}

impl Board {
    pub const ALL: [Board; 4] = [Board::Homework, Board::News, Board::Events, Board::Feedback];

    pub fn table(self) -> &'static str {
        match self {
            Board::Homework => "homework",
            Board::News => "news",
            Board::Events => "events",
            Board::Feedback => "feedback",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Board::Homework => "/api/homework",
            Board::News => "/api/news",
            Board::Events => "/api/events",
            Board::Feedback => "/api/feedback",
        }
    }

    pub fn list_sql(self) -> &'static str {
        match self {
            Board::Homework => {
                "SELECT id, subject, task, deadline FROM homework ORDER BY id DESC LIMIT 20"
            }
            Board::News => "SELECT id, title, content FROM news ORDER BY id DESC LIMIT 20",
            Board::Events => {
                "SELECT id, title, event_date, location FROM events ORDER BY id DESC LIMIT 20"
            }
            Board::Feedback => {
                "SELECT id, category, subject, message FROM feedback ORDER BY id DESC LIMIT 20"
            }
        }
    }
}

/// Rows of one board listing. Serializes as a bare JSON array.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum BoardItems {
    Homework(Vec<HomeworkItem>),
    News(Vec<NewsItem>),
    Events(Vec<Event>),
    Feedback(Vec<FeedbackItem>),
}

impl BoardItems {
    pub fn len(&self) -> usize {
        match self {
            BoardItems::Homework(items) => items.len(),
            BoardItems::News(items) => items.len(),
            BoardItems::Events(items) => items.len(),
            BoardItems::Feedback(items) => items.len(),
        }
    }
}

fn bool_as_int<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    u8::from(*value).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn board_sql_targets_own_table() {
        for board in Board::ALL {
            let sql = board.list_sql();
            assert!(sql.contains(&format!("FROM {} ", board.table())));
            assert!(sql.ends_with("ORDER BY id DESC LIMIT 20"));
            assert!(board.path().ends_with(board.table()));
        }
    }

    #[test]
    fn task_is_done_serializes_as_integer() {
        let task = Task {
            id: 7,
            user_id: Some(1),
            text: Some("read chapter 3".into()),
            is_done: true,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["is_done"], json!(1));
    }

    #[test]
    fn user_summary_uses_full_name_key() {
        let user = UserSummary {
            id: 1,
            full_name: "Ada Lovelace".into(),
            username: "ada".into(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value, json!({"id": 1, "fullName": "Ada Lovelace", "username": "ada"}));
    }

    #[test]
    fn board_items_serialize_as_array() {
        let items = BoardItems::News(vec![NewsItem {
            id: 3,
            title: Some("Trip".into()),
            content: None,
        }]);
        let value = serde_json::to_value(&items).unwrap();
        assert_eq!(value, json!([{"id": 3, "title": "Trip", "content": null}]));
    }
}
