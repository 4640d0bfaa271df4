use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::error::ApiError;
use crate::rows;
use crate::state::AppState;

/// GET /notifications/{user_id} — most recent first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = state
        .with_db("Error fetching notifications", move |db| db.notifications_for_user(user_id))
        .await?;

    Ok(Json(notifications.into_iter().map(rows::notification).collect::<Vec<_>>()))
}

/// POST /notifications/{id}/read
///
/// Not scoped to the caller: any client may mark any notification read.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let found = state
        .with_db("Error marking notification", move |db| {
            db.mark_notification_read(notification_id)
        })
        .await?;
    if !found {
        return Err(ApiError::NotFound("Notification not found"));
    }

    Ok((StatusCode::OK, "Notification marked as read"))
}
