use std::time::Duration;

use axum::extract::OriginalUri;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::state::AppState;

/// Declarative route table for the whole API. The CORS layer wraps every
/// response, the 404 fallback included, and answers OPTIONS anywhere with
/// an empty 200.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", get(api::info))
        .route("/health", get(api::health))
        .route("/init", post(api::init))
        .route(
            "/day-schedules",
            get(api::days::list_day_schedules).post(api::days::set_day_schedule),
        )
        .route(
            "/day-types",
            get(api::days::list_day_types).post(api::days::set_day_type),
        )
        .route(
            "/events",
            get(api::events::list_events).post(api::events::create_event),
        )
        .route(
            "/events/{id}",
            put(api::events::update_event).delete(api::events::delete_event),
        )
        .route(
            "/materials",
            get(api::materials::list_materials).post(api::materials::create_material),
        )
        .route(
            "/materials/{id}",
            put(api::materials::update_material).delete(api::materials::delete_material),
        )
        .method_not_allowed_fallback(not_found);

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(cors())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(24 * 60 * 60))
}

async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    let path = uri.path();
    if path.starts_with("/api") {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Not found",
                "path": path,
                "method": method.as_str(),
            })),
        )
            .into_response()
    } else {
        // Anything outside /api belongs to the static asset host.
        StatusCode::NOT_FOUND.into_response()
    }
}
