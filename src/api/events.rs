use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{Value, json};

use crate::api::{SchoolQuery, parse_body, require_school, required};
use crate::date;
use crate::db::repository::{self, EventChanges, NewEvent};
use crate::error::AppError;
use crate::models::{Event, NewEventRequest, School, UpdateEventRequest};
use crate::state::AppState;

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<SchoolQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let school = require_school(&query)?;
    let pool = state.db.pool().await?;
    Ok(Json(repository::fetch_events(pool, school.as_str()).await?))
}

pub async fn create_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Event>, AppError> {
    let req: NewEventRequest = parse_body(&body);
    let school = req
        .school
        .as_deref()
        .and_then(School::parse)
        .ok_or_else(|| AppError::Validation("school must be \"wlhs\" or \"wvhs\"".to_string()))?;
    let date = date::normalize(&required(req.date, "date")?)?;
    let title = required(req.title, "title")?;

    let pool = state.db.pool().await?;
    let event = repository::insert_event(
        pool,
        NewEvent {
            school: school.as_str(),
            date: &date,
            title: &title,
            department: req.department.as_deref(),
            time: req.time.as_deref(),
            description: req.description.as_deref().unwrap_or(""),
        },
    )
    .await?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Event>, AppError> {
    let req: UpdateEventRequest = parse_body(&body);
    let title = required(req.title, "title")?;

    let pool = state.db.pool().await?;
    let event = repository::update_event(
        pool,
        id,
        EventChanges {
            title: &title,
            department: req.department.as_deref(),
            time: req.time.as_deref(),
            description: req.description.as_deref().unwrap_or(""),
        },
    )
    .await?
    .ok_or(AppError::NotFound)?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let pool = state.db.pool().await?;
    if repository::delete_event(pool, id).await? {
        Ok(Json(json!({ "success": true, "id": id })))
    } else {
        Err(AppError::NotFound)
    }
}
