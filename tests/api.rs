use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use calendar_backend::db::{Database, schema};
use calendar_backend::routes::router;
use calendar_backend::state::AppState;

async fn app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");
    schema::create_all(&pool).await.expect("Failed to create schema");
    router(AppState {
        db: Database::from_pool(pool),
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body was not JSON")
}

#[tokio::test]
async fn options_returns_200_with_cors_headers() {
    let app = app().await;
    for uri in ["/api/events", "/api/nope", "/anywhere"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "OPTIONS {uri}");
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}

#[tokio::test]
async fn error_responses_carry_cors_headers() {
    let app = app().await;
    let response = app.oneshot(get("/api/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn unknown_api_path_reports_path_and_method() {
    let app = app().await;
    let response = app
        .oneshot(send("POST", "/api/unknown/route", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["path"], "/api/unknown/route");
    assert_eq!(body["method"], "POST");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn info_and_health_respond() {
    let app = app().await;

    let response = app.clone().oneshot(get("/api")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let info = body_json(response).await;
    assert!(info["name"].is_string());

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let health = body_json(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["connected"], true);
    assert!(health["timestamp"].is_string());
}

#[tokio::test]
async fn init_is_idempotent_and_reports_tables() {
    let app = app().await;
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(send("POST", "/api/init", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["tables"],
            json!(["day_schedules", "day_types", "events", "materials"])
        );
        assert!(body["message"].is_string());
        assert!(body["features"].is_array());
    }
}

#[tokio::test]
async fn day_schedule_roundtrip_and_null_clears() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/day-schedules",
            json!({ "date": "2025-09-02T00:00:00.000Z", "schedule": "A" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["date"], "2025-09-02");
    assert_eq!(body["schedule"], "A");

    let response = app.clone().oneshot(get("/api/day-schedules")).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed, json!([{ "date": "2025-09-02", "schedule": "A" }]));

    // null schedule clears the row
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/day-schedules",
            json!({ "date": "2025-09-02", "schedule": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/day-schedules")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn day_schedule_rejects_bad_values_without_writing() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/day-schedules",
            json!({ "date": "2025-09-02", "schedule": "C" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(send("POST", "/api/day-schedules", json!({ "schedule": "A" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/day-schedules",
            json!({ "date": "yesterday-ish", "schedule": "A" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/api/day-schedules")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn day_type_accepts_free_form_values() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/day-types",
            json!({ "date": "2025-11-27", "type": "no-school" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["type"], "no-school");

    let response = app.clone().oneshot(get("/api/day-types")).await.unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed[0]["type"], "no-school");

    let response = app
        .clone()
        .oneshot(send("POST", "/api/day-types", json!({ "date": "2025-11-27" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/day-types")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn event_lifecycle() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/events",
            json!({
                "school": "wlhs",
                "date": "2025-09-02",
                "title": "Back to School Night",
                "time": "18:00"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert!(created["id"].is_i64());
    assert_eq!(created["school"], "wlhs");
    assert_eq!(created["description"], "");
    assert!(created["department"].is_null());
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/events?school=wlhs"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0], created);

    // school and date are immutable through PUT
    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            &format!("/api/events/{id}"),
            json!({ "title": "Back to School Night (rescheduled)", "school": "wvhs" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Back to School Night (rescheduled)");
    assert_eq!(updated["school"], "wlhs");
    assert_eq!(updated["date"], "2025-09-02");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/events/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted, json!({ "success": true, "id": id }));

    // second delete misses
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/events/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_validation() {
    let app = app().await;

    // listing requires a valid school
    let response = app.clone().oneshot(get("/api/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = app
        .clone()
        .oneshot(get("/api/events?school=hogwarts"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // create requires school, date, title
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/events",
            json!({ "school": "wlhs", "date": "2025-09-02" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // malformed body degrades to an empty object and fails validation
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/events")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // update of an absent id does not create a row
    let response = app
        .clone()
        .oneshot(send("PUT", "/api/events/12345", json!({ "title": "ghost" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/events?school=wlhs")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn materials_are_scoped_by_school() {
    let app = app().await;

    for (school, title) in [("wlhs", "WL syllabus"), ("wvhs", "WV syllabus")] {
        let response = app
            .clone()
            .oneshot(send(
                "POST",
                "/api/materials",
                json!({
                    "school": school,
                    "date": "2025-09-02",
                    "grade_level": 9,
                    "title": title,
                    "link": "https://example.com/syllabus.pdf"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get("/api/materials?school=wlhs"))
        .await
        .unwrap();
    let listed = body_json(response).await;
    let rows = listed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "WL syllabus");
    assert_eq!(rows[0]["password"], "");

    let response = app
        .oneshot(get("/api/materials?school=wvhs"))
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed[0]["title"], "WV syllabus");
}

#[tokio::test]
async fn material_validation_and_grade_coercion() {
    let app = app().await;

    // numeric string grades are accepted
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/materials",
            json!({
                "school": "wlhs",
                "date": "2025-09-02",
                "grade_level": "11",
                "title": "Handout",
                "link": "https://example.com/handout.pdf",
                "password": "letmein"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["grade_level"], 11);
    assert_eq!(created["password"], "letmein");
    let id = created["id"].as_i64().unwrap();

    // out-of-range grade is rejected
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/materials",
            json!({
                "school": "wlhs",
                "date": "2025-09-02",
                "grade_level": 13,
                "title": "x",
                "link": "y"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // update requires both title and link
    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            &format!("/api/materials/{id}"),
            json!({ "title": "Handout v2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            &format!("/api/materials/{id}"),
            json!({ "title": "Handout v2", "link": "https://example.com/v2.pdf" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Handout v2");
    // full replace: omitted password resets to empty
    assert_eq!(updated["password"], "");

    let response = app
        .oneshot(send("PUT", "/api/materials/99999", json!({ "title": "x", "link": "y" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn materials_list_survives_legacy_schema() {
    // Schema predating the password column.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");
    sqlx::query(
        r#"
        CREATE TABLE materials (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            school TEXT NOT NULL,
            date TEXT NOT NULL,
            grade_level INTEGER NOT NULL,
            title TEXT NOT NULL,
            link TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create legacy table");
    let app = router(AppState {
        db: Database::from_pool(pool),
    });

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/materials",
            json!({
                "school": "wvhs",
                "date": "2025-09-02",
                "grade_level": 10,
                "title": "Legacy upload",
                "link": "https://example.com/legacy.pdf",
                "password": "ignored"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["password"], "");

    let response = app
        .oneshot(get("/api/materials?school=wvhs"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed[0]["title"], "Legacy upload");
    assert_eq!(listed[0]["password"], "");
}
