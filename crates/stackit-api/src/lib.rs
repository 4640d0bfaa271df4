pub mod admin;
pub mod answers;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod notifications;
pub mod notify;
pub mod questions;
pub mod rows;
pub mod sanitize;
pub mod state;

use axum::{
    Json, Router,
    routing::{get, post},
};

use crate::state::AppState;

/// All routes, with state applied. Cross-cutting layers (CORS, tracing) are
/// added by the server binary.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/me", get(auth::me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route("/questions/{id}", get(questions::get_question))
        .route("/questions/{id}/answers", post(answers::post_answer))
        .route("/answers/{id}/vote", post(answers::vote))
        .route("/answers/{id}/accept", post(answers::accept_answer))
        .route("/notifications/{id}", get(notifications::list_notifications))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/admin/ban", post(admin::ban_user))
        .route("/admin/message", post(admin::broadcast_message))
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
