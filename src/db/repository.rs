use chrono::Utc;
use sqlx::SqlitePool;

use crate::date;
use crate::models::{DaySchedule, DayType, Event, Material};

// ---------------------------------------------------------------------------
// Day schedules / day types (one row per date)

pub async fn fetch_day_schedules(db: &SqlitePool) -> Result<Vec<DaySchedule>, sqlx::Error> {
    let mut rows = sqlx::query_as::<_, DaySchedule>(
        "SELECT date, schedule FROM day_schedules ORDER BY date ASC",
    )
    .fetch_all(db)
    .await?;
    for row in &mut rows {
        row.date = date::normalize_lossy(&row.date);
    }
    Ok(rows)
}

pub async fn upsert_day_schedule(
    db: &SqlitePool,
    date: &str,
    schedule: &str,
) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO day_schedules (date, schedule, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        ON CONFLICT(date) DO UPDATE SET
            schedule = excluded.schedule,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(date)
    .bind(schedule)
    .bind(&now)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete_day_schedule(db: &SqlitePool, date: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM day_schedules WHERE date = ?")
        .bind(date)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn fetch_day_types(db: &SqlitePool) -> Result<Vec<DayType>, sqlx::Error> {
    let mut rows = sqlx::query_as::<_, DayType>(
        r#"SELECT date, "type" FROM day_types ORDER BY date ASC"#,
    )
    .fetch_all(db)
    .await?;
    for row in &mut rows {
        row.date = date::normalize_lossy(&row.date);
    }
    Ok(rows)
}

pub async fn upsert_day_type(db: &SqlitePool, date: &str, kind: &str) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO day_types (date, "type", created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        ON CONFLICT(date) DO UPDATE SET
            "type" = excluded."type",
            updated_at = excluded.updated_at
        "#,
    )
    .bind(date)
    .bind(kind)
    .bind(&now)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete_day_type(db: &SqlitePool, date: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM day_types WHERE date = ?")
        .bind(date)
        .execute(db)
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Events (many per date, school-scoped)

pub async fn fetch_events(db: &SqlitePool, school: &str) -> Result<Vec<Event>, sqlx::Error> {
    let mut rows = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, school, date, title, department, time, description, created_at, updated_at
        FROM events
        WHERE school = ?
        ORDER BY date ASC, time ASC, id ASC
        "#,
    )
    .bind(school)
    .fetch_all(db)
    .await?;
    for row in &mut rows {
        row.date = date::normalize_lossy(&row.date);
    }
    Ok(rows)
}

pub async fn fetch_event(db: &SqlitePool, id: i64) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "SELECT id, school, date, title, department, time, description, created_at, updated_at \
         FROM events WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub struct NewEvent<'a> {
    pub school: &'a str,
    pub date: &'a str,
    pub title: &'a str,
    pub department: Option<&'a str>,
    pub time: Option<&'a str>,
    pub description: &'a str,
}

pub async fn insert_event(db: &SqlitePool, event: NewEvent<'_>) -> Result<Event, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"
        INSERT INTO events (school, date, title, department, time, description, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        "#,
    )
    .bind(event.school)
    .bind(event.date)
    .bind(event.title)
    .bind(event.department)
    .bind(event.time)
    .bind(event.description)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Event {
        id: result.last_insert_rowid(),
        school: event.school.to_string(),
        date: event.date.to_string(),
        title: event.title.to_string(),
        department: event.department.map(str::to_string),
        time: event.time.map(str::to_string),
        description: event.description.to_string(),
        created_at: now.clone(),
        updated_at: now,
    })
}

pub struct EventChanges<'a> {
    pub title: &'a str,
    pub department: Option<&'a str>,
    pub time: Option<&'a str>,
    pub description: &'a str,
}

/// Replaces the mutable fields of an event. School and date stay as they
/// were created. Returns `None` when no row has the given id.
pub async fn update_event(
    db: &SqlitePool,
    id: i64,
    changes: EventChanges<'_>,
) -> Result<Option<Event>, sqlx::Error> {
    let mut current = match fetch_event(db, id).await? {
        Some(event) => event,
        None => return Ok(None),
    };

    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        UPDATE events
        SET title = ?1, department = ?2, time = ?3, description = ?4, updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(changes.title)
    .bind(changes.department)
    .bind(changes.time)
    .bind(changes.description)
    .bind(&now)
    .bind(id)
    .execute(db)
    .await?;

    current.title = changes.title.to_string();
    current.department = changes.department.map(str::to_string);
    current.time = changes.time.map(str::to_string);
    current.description = changes.description.to_string();
    current.updated_at = now;
    current.date = date::normalize_lossy(&current.date);
    Ok(Some(current))
}

pub async fn delete_event(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(affected > 0)
}

// ---------------------------------------------------------------------------
// Materials (many per date/grade, school-scoped)
//
// Deployments that predate the password column still exist. Every statement
// that touches that column retries without it on failure and reports the
// password as an empty string.

const MATERIAL_COLUMNS: &str =
    "id, school, date, grade_level, title, link, description, password, created_at, updated_at";
const MATERIAL_COLUMNS_LEGACY: &str =
    "id, school, date, grade_level, title, link, description, '' AS password, created_at, updated_at";

pub async fn fetch_materials(db: &SqlitePool, school: &str) -> Result<Vec<Material>, sqlx::Error> {
    let sql = format!(
        "SELECT {MATERIAL_COLUMNS} FROM materials WHERE school = ? \
         ORDER BY date ASC, grade_level ASC, id ASC"
    );
    let mut rows = match sqlx::query_as::<_, Material>(&sql)
        .bind(school)
        .fetch_all(db)
        .await
    {
        Ok(rows) => rows,
        Err(_) => {
            let sql = format!(
                "SELECT {MATERIAL_COLUMNS_LEGACY} FROM materials WHERE school = ? \
                 ORDER BY date ASC, grade_level ASC, id ASC"
            );
            sqlx::query_as::<_, Material>(&sql)
                .bind(school)
                .fetch_all(db)
                .await?
        }
    };
    for row in &mut rows {
        row.date = date::normalize_lossy(&row.date);
    }
    Ok(rows)
}

pub async fn fetch_material(db: &SqlitePool, id: i64) -> Result<Option<Material>, sqlx::Error> {
    let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = ?");
    match sqlx::query_as::<_, Material>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
    {
        Ok(row) => Ok(row),
        Err(_) => {
            let sql = format!("SELECT {MATERIAL_COLUMNS_LEGACY} FROM materials WHERE id = ?");
            sqlx::query_as::<_, Material>(&sql)
                .bind(id)
                .fetch_optional(db)
                .await
        }
    }
}

pub struct NewMaterial<'a> {
    pub school: &'a str,
    pub date: &'a str,
    pub grade_level: i64,
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
    pub password: &'a str,
}

pub async fn insert_material(
    db: &SqlitePool,
    material: NewMaterial<'_>,
) -> Result<Material, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let attempt = sqlx::query(
        r#"
        INSERT INTO materials
            (school, date, grade_level, title, link, description, password, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
        "#,
    )
    .bind(material.school)
    .bind(material.date)
    .bind(material.grade_level)
    .bind(material.title)
    .bind(material.link)
    .bind(material.description)
    .bind(material.password)
    .bind(&now)
    .execute(db)
    .await;

    let (id, stored_password) = match attempt {
        Ok(result) => (result.last_insert_rowid(), material.password.to_string()),
        Err(_) => {
            let result = sqlx::query(
                r#"
                INSERT INTO materials
                    (school, date, grade_level, title, link, description, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                "#,
            )
            .bind(material.school)
            .bind(material.date)
            .bind(material.grade_level)
            .bind(material.title)
            .bind(material.link)
            .bind(material.description)
            .bind(&now)
            .execute(db)
            .await?;
            (result.last_insert_rowid(), String::new())
        }
    };

    Ok(Material {
        id,
        school: material.school.to_string(),
        date: material.date.to_string(),
        grade_level: material.grade_level,
        title: material.title.to_string(),
        link: material.link.to_string(),
        description: material.description.to_string(),
        password: stored_password,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub struct MaterialChanges<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
    pub password: &'a str,
}

pub async fn update_material(
    db: &SqlitePool,
    id: i64,
    changes: MaterialChanges<'_>,
) -> Result<Option<Material>, sqlx::Error> {
    let mut current = match fetch_material(db, id).await? {
        Some(material) => material,
        None => return Ok(None),
    };

    let now = Utc::now().to_rfc3339();
    let attempt = sqlx::query(
        r#"
        UPDATE materials
        SET title = ?1, link = ?2, description = ?3, password = ?4, updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(changes.title)
    .bind(changes.link)
    .bind(changes.description)
    .bind(changes.password)
    .bind(&now)
    .bind(id)
    .execute(db)
    .await;

    let stored_password = match attempt {
        Ok(_) => changes.password.to_string(),
        Err(_) => {
            sqlx::query(
                r#"
                UPDATE materials
                SET title = ?1, link = ?2, description = ?3, updated_at = ?4
                WHERE id = ?5
                "#,
            )
            .bind(changes.title)
            .bind(changes.link)
            .bind(changes.description)
            .bind(&now)
            .bind(id)
            .execute(db)
            .await?;
            String::new()
        }
    };

    current.title = changes.title.to_string();
    current.link = changes.link.to_string();
    current.description = changes.description.to_string();
    current.password = stored_password;
    current.updated_at = now;
    current.date = date::normalize_lossy(&current.date);
    Ok(Some(current))
}

pub async fn delete_material(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM materials WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    Ok(affected > 0)
}
