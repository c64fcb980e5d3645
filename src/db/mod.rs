pub mod repository;
pub mod schema;

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::AppError;

/// Handle to the pooled database connection. The pool is created lazily on
/// first use and memoized; clones share the same pool. Handlers receive this
/// through `AppState` rather than reaching for module-global state.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

struct Inner {
    url: Option<String>,
    pool: OnceCell<SqlitePool>,
}

impl Database {
    /// Reads the connection string from `DATABASE_URL`. The variable may be
    /// absent; the error surfaces on first pool use, not at construction.
    pub fn from_env() -> Self {
        Self::new(std::env::var("DATABASE_URL").ok())
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new(Some(url.into()))
    }

    /// Wraps an already-connected pool. Used by tests.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Database {
            inner: Arc::new(Inner {
                url: None,
                pool: OnceCell::new_with(Some(pool)),
            }),
        }
    }

    fn new(url: Option<String>) -> Self {
        Database {
            inner: Arc::new(Inner {
                url,
                pool: OnceCell::new(),
            }),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.inner.url.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.url.is_some() || self.inner.pool.initialized()
    }

    /// Returns the shared pool, connecting on first use. Fails with
    /// `Configuration` when no connection string is available.
    pub async fn pool(&self) -> Result<&SqlitePool, AppError> {
        self.inner
            .pool
            .get_or_try_init(|| async {
                let url = self.inner.url.as_deref().ok_or_else(|| {
                    AppError::Configuration("DATABASE_URL is not set".to_string())
                })?;
                let pool = connect(url).await?;
                info!("database pool connected");
                Ok(pool)
            })
            .await
    }
}

/// Pool sizing bounds request concurrency; acquire waits up to the timeout
/// when every connection is busy and then surfaces as a storage error.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(url)
        .await
}
