use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{Value, json};

use crate::api::{SchoolQuery, parse_body, require_school, required};
use crate::date;
use crate::db::repository::{self, MaterialChanges, NewMaterial};
use crate::error::AppError;
use crate::models::{Material, NewMaterialRequest, School, UpdateMaterialRequest};
use crate::state::AppState;

pub async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<SchoolQuery>,
) -> Result<Json<Vec<Material>>, AppError> {
    let school = require_school(&query)?;
    let pool = state.db.pool().await?;
    Ok(Json(repository::fetch_materials(pool, school.as_str()).await?))
}

/// Accepts the grade as a JSON number or numeric string.
fn coerce_grade(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub async fn create_material(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Material>, AppError> {
    let req: NewMaterialRequest = parse_body(&body);
    let school = req
        .school
        .as_deref()
        .and_then(School::parse)
        .ok_or_else(|| AppError::Validation("school must be \"wlhs\" or \"wvhs\"".to_string()))?;
    let date = date::normalize(&required(req.date, "date")?)?;
    let grade_level = coerce_grade(req.grade_level.as_ref())
        .filter(|g| (9..=12).contains(g))
        .ok_or_else(|| {
            AppError::Validation("grade_level must be 9, 10, 11, or 12".to_string())
        })?;
    let title = required(req.title, "title")?;
    let link = required(req.link, "link")?;

    let pool = state.db.pool().await?;
    let material = repository::insert_material(
        pool,
        NewMaterial {
            school: school.as_str(),
            date: &date,
            grade_level,
            title: &title,
            link: &link,
            description: req.description.as_deref().unwrap_or(""),
            password: req.password.as_deref().unwrap_or(""),
        },
    )
    .await?;
    Ok(Json(material))
}

pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Material>, AppError> {
    let req: UpdateMaterialRequest = parse_body(&body);
    let title = required(req.title, "title")?;
    let link = required(req.link, "link")?;

    let pool = state.db.pool().await?;
    let material = repository::update_material(
        pool,
        id,
        MaterialChanges {
            title: &title,
            link: &link,
            description: req.description.as_deref().unwrap_or(""),
            password: req.password.as_deref().unwrap_or(""),
        },
    )
    .await?
    .ok_or(AppError::NotFound)?;
    Ok(Json(material))
}

pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let pool = state.db.pool().await?;
    if repository::delete_material(pool, id).await? {
        Ok(Json(json!({ "success": true, "id": id })))
    } else {
        Err(AppError::NotFound)
    }
}
