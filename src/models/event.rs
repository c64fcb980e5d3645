use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub school: String,
    pub date: String,
    pub title: String,
    pub department: Option<String>,
    pub time: Option<String>,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEventRequest {
    pub school: Option<String>,
    pub date: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
}

/// Full replace of the mutable fields. School and date are immutable
/// after creation and deliberately absent here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
}
