use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use stackit_types::api::{CreateQuestionRequest, CreatedResponse, QuestionDetailResponse};

use crate::error::ApiError;
use crate::rows;
use crate::sanitize::{required_text, rich_text};
use crate::state::AppState;

const MISSING: &str = "Title and user_id required";

/// POST /questions — tags are stored as a JSON array; a missing list is `[]`.
pub async fn create_question(
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = required_text(req.title, MISSING)?;
    let user_id = req.user_id.ok_or(ApiError::BadRequest(MISSING))?;
    let description = req.description.map(|d| rich_text(&d));
    let tags_json = serde_json::to_string(&req.tags.unwrap_or_default())
        .map_err(|_| ApiError::Internal("Error posting question"))?;

    let id = state
        .with_db("Error posting question", move |db| {
            db.insert_question(&title, description.as_deref(), &tags_json, user_id)
        })
        .await?;

    debug!(question_id = id, user_id, "Question posted");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn list_questions(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let questions = state
        .with_db("Error fetching questions", |db| db.list_questions())
        .await?;

    Ok(Json(questions.into_iter().map(rows::question).collect::<Vec<_>>()))
}

/// GET /questions/{id} — the question together with its answers.
pub async fn get_question(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let (question, answers) = state
        .with_db("Error fetching question", move |db| {
            let Some(question) = db.get_question(question_id)? else {
                return Ok((None, Vec::new()));
            };
            let answers = db.answers_for_question(question_id)?;
            Ok((Some(question), answers))
        })
        .await?;

    let question = question.ok_or(ApiError::NotFound("Question not found"))?;

    Ok(Json(QuestionDetailResponse {
        question: rows::question(question),
        answers: answers.into_iter().map(rows::answer).collect(),
    }))
}
