mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use stackit_api::notify::NotificationSink;
use stackit_api::state::{AppState, AppStateInner};
use stackit_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stackit_server=debug,stackit_api=debug,stackit_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_placeholder_secret() {
        warn!("STACKIT_JWT_SECRET is unset; using the development placeholder");
    }

    let db = Arc::new(Database::open(&config.db_path)?);

    if let Some(seed) = config.admin.clone() {
        let seed_db = db.clone();
        let admin_id = tokio::task::spawn_blocking(move || {
            let password_hash = stackit_api::auth::hash_password(&seed.password)?;
            seed_db.ensure_admin(&seed.username, &password_hash)
        })
        .await??;
        info!(admin_id, "Admin account ensured");
    }

    let (notifier, notifier_task) = NotificationSink::spawn(db.clone());

    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: config.jwt_secret.clone(),
        notifier,
    });

    let app = stackit_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("StackIt server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and its sink) is gone; let queued notifications land.
    drain_notifications(notifier_task, Duration::from_secs(5)).await;

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Drain {
    Drained,
    WorkerFailed,
    TimedOut,
}

async fn drain_notifications(worker: JoinHandle<()>, limit: Duration) -> Drain {
    match tokio::time::timeout(limit, worker).await {
        Ok(Ok(())) => {
            info!("Notification queue drained");
            Drain::Drained
        }
        Ok(Err(e)) => {
            error!("Notification worker failed: {}", e);
            Drain::WorkerFailed
        }
        Err(_) => {
            warn!("Timed out draining notification queue");
            Drain::TimedOut
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
