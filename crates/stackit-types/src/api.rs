use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Role;

// Request fields are optional so that a missing field surfaces as a 400
// from the handler instead of a deserialization rejection.

// -- JWT Claims --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Body returned by every creation endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

// -- Questions --

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub user_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionDetailResponse {
    #[serde(flatten)]
    pub question: QuestionResponse,
    pub answers: Vec<AnswerResponse>,
}

// -- Answers --

#[derive(Debug, Deserialize)]
pub struct CreateAnswerRequest {
    pub content: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub id: i64,
    pub question_id: i64,
    pub content: String,
    pub user_id: i64,
    pub username: String,
    pub votes: i64,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
}

/// Signed vote delta. No bound is enforced.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptAnswerRequest {
    pub user_id: Option<i64>,
}

// -- Notifications --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// -- Admin --

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub user_id: Option<i64>,
    pub admin_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub message: Option<String>,
    pub admin_id: Option<i64>,
}
