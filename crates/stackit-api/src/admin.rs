use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use stackit_types::api::{BanRequest, BroadcastRequest};
use stackit_types::models::Role;

use crate::error::ApiError;
use crate::sanitize::required_text;
use crate::state::AppState;

const ADMIN_REQUIRED: &str = "Admin access required";

/// A missing id is a 400; unknown ids and non-admin roles are both 403.
async fn require_admin(state: &AppState, admin_id: Option<i64>) -> Result<i64, ApiError> {
    let admin_id = admin_id.ok_or(ApiError::BadRequest("admin_id required"))?;
    let role = state
        .with_db("Error checking admin", move |db| {
            Ok(db.get_user_by_id(admin_id)?.map(|u| u.role))
        })
        .await?;

    match role {
        Some(role) if role.is_admin() => Ok(admin_id),
        _ => {
            warn!(admin_id, "Admin action rejected");
            Err(ApiError::Forbidden(ADMIN_REQUIRED))
        }
    }
}

/// POST /admin/ban
pub async fn ban_user(
    State(state): State<AppState>,
    Json(req): Json<BanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target = req.user_id.ok_or(ApiError::BadRequest("user_id required"))?;
    let admin_id = require_admin(&state, req.admin_id).await?;

    let found = state
        .with_db("Error banning user", move |db| db.set_user_role(target, Role::Banned))
        .await?;
    if !found {
        return Err(ApiError::NotFound("User not found"));
    }

    info!(admin_id, user_id = target, "User banned");
    Ok((StatusCode::OK, "User banned"))
}

/// POST /admin/message — one notification per user that is not banned.
pub async fn broadcast_message(
    State(state): State<AppState>,
    Json(req): Json<BroadcastRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = required_text(req.message, "Message required")?;
    let admin_id = require_admin(&state, req.admin_id).await?;

    let sent = state
        .with_db("Error sending message", move |db| db.broadcast_notification(&message))
        .await?;

    info!(admin_id, recipients = sent, "Broadcast sent");
    Ok((StatusCode::OK, format!("Message sent to {} users", sent)))
}
