use std::sync::Arc;

use tracing::error;

use stackit_db::Database;

use crate::error::ApiError;
use crate::notify::NotificationSink;

pub type AppState = Arc<AppStateInner>;

/// Built once at startup and handed to every handler through axum `State`.
pub struct AppStateInner {
    pub db: Arc<Database>,
    pub jwt_secret: String,
    pub notifier: NotificationSink,
}

impl AppStateInner {
    /// Run a blocking database operation off the async runtime.
    ///
    /// Any failure is logged and surfaces as a 500 carrying `context` as its
    /// message.
    pub async fn with_db<F, T>(&self, context: &'static str, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(context)
            })?
            .map_err(|e| {
                error!("{}: {:#}", context, e);
                ApiError::Internal(context)
            })
    }
}
