use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

// Registration fields are optional here so a missing field becomes a 400, not an extractor rejection
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RegisterSchema {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoginSchema {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct TaskQuery {
    #[serde(rename = "userId", default, deserialize_with = "lenient_id")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CreateTaskSchema {
    #[serde(rename = "userId", deserialize_with = "lenient_id")]
    pub user_id: Option<i64>,
    pub text: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CreateChatSchema {
    pub username: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NewHomework {
    pub subject: Option<String>,
    pub task: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NewNews {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NewEvent {
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_datetime")]
    pub event_date: Option<NaiveDateTime>,
    pub location: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NewFeedback {
    pub category: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// One insert into a board, tagged by the board it belongs to.
#[derive(Debug)]
pub enum BoardPost {
    Homework(NewHomework),
    News(NewNews),
    Events(NewEvent),
    Feedback(NewFeedback),
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ClearDatabaseQuery {
    pub confirm: Option<String>,
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

// Query strings always carry text and some clients quote ids in JSON too.
// Anything that isn't an integer matches no row, so it becomes NULL.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(id)) => Some(id),
        Some(RawId::Text(raw)) => raw.trim().parse().ok(),
        None => None,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

// Browser date-time inputs omit seconds, SQL clients use a space separator
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: {raw}")))
}
