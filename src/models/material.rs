use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Material {
    pub id: i64,
    pub school: String,
    pub date: String,
    pub grade_level: i64,
    pub title: String,
    pub link: String,
    pub description: String,
    pub password: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMaterialRequest {
    pub school: Option<String>,
    pub date: Option<String>,
    /// Arrives as either a JSON number or a numeric string; coerced by the
    /// handler before validation.
    pub grade_level: Option<Value>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMaterialRequest {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub password: Option<String>,
}
