pub mod days;
pub mod events;
pub mod materials;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::db;
use crate::db::schema;
use crate::error::AppError;
use crate::models::School;
use crate::state::AppState;

/// Parses a JSON request body leniently: a missing or malformed body acts
/// as an empty object, which then fails required-field validation.
pub(crate) fn parse_body<T: Default + DeserializeOwned>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

/// Extracts a required string field, treating blank values as missing.
pub(crate) fn required(field: Option<String>, name: &str) -> Result<String, AppError> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

/// Query shape shared by the school-scoped list endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SchoolQuery {
    pub school: Option<String>,
}

pub(crate) fn require_school(query: &SchoolQuery) -> Result<School, AppError> {
    query
        .school
        .as_deref()
        .and_then(School::parse)
        .ok_or_else(|| AppError::Validation("school must be \"wlhs\" or \"wvhs\"".to_string()))
}

pub async fn info() -> Json<Value> {
    Json(json!({
        "name": "School Calendar API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/health",
            "init": "POST /api/init",
            "day_schedules": "GET|POST /api/day-schedules",
            "day_types": "GET|POST /api/day-types",
            "events": "GET|POST /api/events, PUT|DELETE /api/events/{id}",
            "materials": "GET|POST /api/materials, PUT|DELETE /api/materials/{id}",
        },
    }))
}

pub async fn health(State(state): State<AppState>) -> Response {
    let check = async {
        let pool = state.db.pool().await?;
        sqlx::query("select 1").execute(pool).await?;
        Ok::<_, AppError>(())
    };

    match check.await {
        Ok(()) => Json(json!({
            "status": "ok",
            "connected": true,
            "timestamp": Utc::now().to_rfc3339(),
            "database": database_kind(state.db.url()),
        }))
        .into_response(),
        Err(err) => {
            warn!("health check failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Database connection failed",
                    "connected": false,
                    "details": err.to_string(),
                })),
            )
                .into_response()
        }
    }
}

fn database_kind(url: Option<&str>) -> &str {
    url.and_then(|u| u.split(':').next()).unwrap_or("sqlite")
}

#[derive(Debug, Default, Deserialize)]
struct InitRequest {
    #[serde(rename = "dbUrl")]
    db_url: Option<String>,
}

/// Administrative schema setup. Runs only when called, never per request.
/// An explicit `dbUrl` in the body targets that database instead of the
/// configured one.
pub async fn init(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: InitRequest = parse_body(&body);

    match req.db_url {
        Some(url) => {
            let pool = db::connect(&url).await.map_err(schema_error)?;
            let result = schema::create_all(&pool).await;
            pool.close().await;
            result.map_err(schema_error)?;
        }
        None => {
            if !state.db.is_configured() {
                return Err(AppError::Validation(
                    "A database connection string is required; set DATABASE_URL or pass dbUrl"
                        .to_string(),
                ));
            }
            let pool = state.db.pool().await.map_err(|err| match err {
                AppError::Database(e) => schema_error(e),
                other => other,
            })?;
            schema::create_all(pool).await.map_err(schema_error)?;
        }
    }

    info!("schema initialized");
    Ok(Json(json!({
        "message": "Database initialized",
        "tables": schema::TABLES,
        "features": [
            "A/B day schedules",
            "day type annotations",
            "school-scoped events",
            "grade-level materials with optional password",
        ],
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response())
}

fn schema_error(err: sqlx::Error) -> AppError {
    AppError::Schema {
        suggestion: schema::connect_hint(&err).map(str::to_string),
        message: err.to_string(),
    }
}
