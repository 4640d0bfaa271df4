//! Conversions from database rows to API responses.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use stackit_db::models::{AnswerRow, NotificationRow, QuestionRow, UserRow};
use stackit_types::api::{AnswerResponse, NotificationResponse, QuestionResponse, UserResponse};

/// SQLite stores `datetime('now')` as "YYYY-MM-DD HH:MM:SS" without a
/// timezone; treat it as UTC.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub fn question(row: QuestionRow) -> QuestionResponse {
    let tags = serde_json::from_str::<Vec<String>>(&row.tags).unwrap_or_else(|e| {
        warn!("Corrupt tags on question {}: {}", row.id, e);
        Vec::new()
    });

    QuestionResponse {
        id: row.id,
        title: row.title,
        description: row.description,
        tags,
        user_id: row.user_id,
        username: row.username,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn answer(row: AnswerRow) -> AnswerResponse {
    AnswerResponse {
        id: row.id,
        question_id: row.question_id,
        content: row.content,
        user_id: row.user_id,
        username: row.username,
        votes: row.votes,
        is_accepted: row.is_accepted,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn notification(row: NotificationRow) -> NotificationResponse {
    NotificationResponse {
        id: row.id,
        user_id: row.user_id,
        message: row.message,
        is_read: row.is_read,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn user(row: UserRow) -> UserResponse {
    UserResponse {
        id: row.id,
        username: row.username,
        role: row.role,
        created_at: parse_timestamp(&row.created_at),
    }
}
