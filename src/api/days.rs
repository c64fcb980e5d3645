use axum::body::Bytes;
use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::api::{parse_body, required};
use crate::date;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{DaySchedule, DayType, SetDayRequest};
use crate::state::AppState;

pub async fn list_day_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<DaySchedule>>, AppError> {
    let pool = state.db.pool().await?;
    Ok(Json(repository::fetch_day_schedules(pool).await?))
}

/// Upsert keyed on date. A null or absent `schedule` clears the row;
/// anything other than "A" or "B" is rejected before storage is touched.
pub async fn set_day_schedule(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let req: SetDayRequest = parse_body(&body);
    let date = date::normalize(&required(req.date, "date")?)?;

    match req.schedule {
        Some(schedule) => {
            if schedule != "A" && schedule != "B" {
                return Err(AppError::Validation(
                    "schedule must be \"A\" or \"B\"".to_string(),
                ));
            }
            let pool = state.db.pool().await?;
            repository::upsert_day_schedule(pool, &date, &schedule).await?;
            Ok(Json(json!({ "success": true, "date": date, "schedule": schedule })))
        }
        None => {
            let pool = state.db.pool().await?;
            repository::delete_day_schedule(pool, &date).await?;
            Ok(Json(json!({ "success": true, "date": date, "schedule": Value::Null })))
        }
    }
}

pub async fn list_day_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<DayType>>, AppError> {
    let pool = state.db.pool().await?;
    Ok(Json(repository::fetch_day_types(pool).await?))
}

pub async fn set_day_type(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let req: SetDayRequest = parse_body(&body);
    let date = date::normalize(&required(req.date, "date")?)?;
    let pool = state.db.pool().await?;

    match req.kind {
        Some(kind) => {
            repository::upsert_day_type(pool, &date, &kind).await?;
            Ok(Json(json!({ "success": true, "date": date, "type": kind })))
        }
        None => {
            repository::delete_day_type(pool, &date).await?;
            Ok(Json(json!({ "success": true, "date": date, "type": Value::Null })))
        }
    }
}
