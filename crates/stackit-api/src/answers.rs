use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info, warn};

use stackit_db::models::{AcceptOutcome, VoteOutcome};
use stackit_types::api::{AcceptAnswerRequest, CreateAnswerRequest, CreatedResponse, VoteRequest};

use crate::error::ApiError;
use crate::notify::Notice;
use crate::sanitize::{required_text, rich_text};
use crate::state::AppState;

/// POST /questions/{id}/answers
///
/// The question owner's notification is queued after the insert and is not
/// awaited.
pub async fn post_answer(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(req): Json<CreateAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "Content and user_id required";
    let content = required_text(req.content.map(|c| rich_text(&c)), MISSING)?;
    let user_id = req.user_id.ok_or(ApiError::BadRequest(MISSING))?;

    let id = state
        .with_db("Error posting answer", move |db| {
            db.insert_answer(question_id, &content, user_id)
        })
        .await?;

    state.notifier.send(Notice::NewAnswer {
        question_id,
        answerer_id: user_id,
    });

    debug!(answer_id = id, question_id, user_id, "Answer posted");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST /answers/{id}/vote — adds an arbitrary signed delta.
pub async fn vote(
    State(state): State<AppState>,
    Path(answer_id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let delta = req.vote.ok_or(ApiError::BadRequest("Vote required"))?;

    let outcome = state
        .with_db("Error voting", move |db| db.add_vote(answer_id, delta))
        .await?;

    match outcome {
        VoteOutcome::Recorded(votes) => {
            debug!(answer_id, delta, votes, "Vote recorded");
            Ok((StatusCode::OK, "Vote recorded"))
        }
        VoteOutcome::Overflow => Err(ApiError::BadRequest("Vote total out of range")),
        VoteOutcome::AnswerNotFound => Err(ApiError::NotFound("Answer not found")),
    }
}

/// POST /answers/{id}/accept — only the question's owner may accept.
/// Previously accepted answers on the same question stay accepted.
pub async fn accept_answer(
    State(state): State<AppState>,
    Path(answer_id): Path<i64>,
    Json(req): Json<AcceptAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = req.user_id.ok_or(ApiError::BadRequest("user_id required"))?;

    let outcome = state
        .with_db("Error accepting answer", move |db| db.accept_answer(answer_id, user_id))
        .await?;

    match outcome {
        AcceptOutcome::Accepted => {
            info!(answer_id, user_id, "Answer accepted");
            Ok((StatusCode::OK, "Answer accepted"))
        }
        AcceptOutcome::NotOwner => {
            warn!(answer_id, user_id, "Accept attempted by non-owner");
            Err(ApiError::Forbidden("Only question owner can accept"))
        }
        AcceptOutcome::AnswerNotFound => Err(ApiError::NotFound("Answer not found")),
    }
}
