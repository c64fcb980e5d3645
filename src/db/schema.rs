use sqlx::SqlitePool;

pub const TABLES: [&str; 4] = ["day_schedules", "day_types", "events", "materials"];

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS day_schedules (
        date TEXT PRIMARY KEY,
        schedule TEXT NOT NULL CHECK (schedule IN ('A', 'B')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_day_schedules_date ON day_schedules(date)",
    r#"
    CREATE TABLE IF NOT EXISTS day_types (
        date TEXT PRIMARY KEY,
        "type" TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_day_types_date ON day_types(date)",
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        school TEXT NOT NULL CHECK (school IN ('wlhs', 'wvhs')),
        date TEXT NOT NULL,
        title TEXT NOT NULL,
        department TEXT,
        time TEXT,
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_events_school_date ON events(school, date)",
    "CREATE INDEX IF NOT EXISTS idx_events_date ON events(date)",
    r#"
    CREATE TABLE IF NOT EXISTS materials (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        school TEXT NOT NULL CHECK (school IN ('wlhs', 'wvhs')),
        date TEXT NOT NULL,
        grade_level INTEGER NOT NULL CHECK (grade_level BETWEEN 9 AND 12),
        title TEXT NOT NULL,
        link TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        password TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_materials_school_date_grade ON materials(school, date, grade_level)",
    "CREATE INDEX IF NOT EXISTS idx_materials_date ON materials(date)",
];

/// Creates the four tables and their indexes. Every statement is
/// create-if-absent, so re-running init is harmless.
pub async fn create_all(db: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in DDL {
        sqlx::query(statement).execute(db).await?;
    }
    Ok(())
}

/// Maps common connectivity failure causes to a suggestion a human can act
/// on. Anything unrecognized passes through with its native message only.
pub fn connect_hint(err: &sqlx::Error) -> Option<&'static str> {
    let message = err.to_string().to_lowercase();
    if message.contains("failed to lookup address")
        || message.contains("name or service not known")
        || message.contains("no such host")
    {
        Some("The database host could not be resolved. Check the host name in the connection string.")
    } else if message.contains("connection refused") {
        Some("The database server refused the connection. Verify it is running and that the port is correct.")
    } else if message.contains("authentication") || message.contains("access denied") {
        Some("Authentication failed. Verify the database user name and password.")
    } else if message.contains("does not exist") || message.contains("unable to open database file") {
        Some("The database does not exist. Create it before running init.")
    } else {
        None
    }
}
