//! Database row types. These map directly to SQLite rows and keep
//! timestamps as the raw `datetime('now')` text; the API layer converts.

use stackit_types::models::Role;

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub created_at: String,
}

pub struct QuestionRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// JSON array text.
    pub tags: String,
    pub user_id: i64,
    pub username: String,
    pub created_at: String,
}

pub struct AnswerRow {
    pub id: i64,
    pub question_id: i64,
    pub content: String,
    pub user_id: i64,
    pub username: String,
    pub votes: i64,
    pub is_accepted: bool,
    pub created_at: String,
}

pub struct NotificationRow {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

/// Result of an accept-answer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    Accepted,
    NotOwner,
    AnswerNotFound,
}

/// Result of applying a vote delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded(i64),
    AnswerNotFound,
    /// The new total would not fit in an i64; nothing was written.
    Overflow,
}
