use crate::Database;
use crate::models::{AcceptOutcome, AnswerRow, NotificationRow, QuestionRow, UserRow, VoteOutcome};
use anyhow::Result;
use rusqlite::{Connection, Row, params};
use stackit_types::models::Role;

const USER_COLUMNS: &str = "id, username, password, role, created_at";

const QUESTION_SELECT: &str = "SELECT q.id, q.title, q.description, q.tags, q.user_id, u.username, q.created_at
     FROM questions q
     JOIN users u ON q.user_id = u.id";

const ANSWER_SELECT: &str = "SELECT a.id, a.question_id, a.content, a.user_id, u.username, a.votes, a.is_accepted, a.created_at
     FROM answers a
     LEFT JOIN users u ON a.user_id = u.id";

impl Database {
    // -- Users --

    /// Insert a user. Returns `None` when the username is already taken.
    pub fn create_user(&self, username: &str, password_hash: &str, role: Role) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            match conn.execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
                (username, password_hash, role.as_str()),
            ) {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Create `username` as an admin, or promote the existing account.
    /// The stored password of an existing account is left alone.
    pub fn ensure_admin(&self, username: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)
                 ON CONFLICT(username) DO UPDATE SET role = excluded.role",
                (username, password_hash, Role::Admin.as_str()),
            )?;
            let id = conn.query_row("SELECT id FROM users WHERE username = ?1", [username], |row| {
                row.get(0)
            })?;
            Ok(id)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
            conn.query_row(&sql, [username], user_from_row).optional()
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    /// Returns false when no user has that id.
    pub fn set_user_role(&self, id: i64, role: Role) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET role = ?1 WHERE id = ?2",
                params![role.as_str(), id],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Questions --

    pub fn insert_question(
        &self,
        title: &str,
        description: Option<&str>,
        tags_json: &str,
        user_id: i64,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO questions (title, description, tags, user_id) VALUES (?1, ?2, ?3, ?4)",
                params![title, description, tags_json, user_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All questions with their author's username, newest first.
    pub fn list_questions(&self) -> Result<Vec<QuestionRow>> {
        self.with_conn(|conn| {
            let sql = format!("{QUESTION_SELECT} ORDER BY q.created_at DESC, q.id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], question_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_question(&self, id: i64) -> Result<Option<QuestionRow>> {
        self.with_conn(|conn| {
            let sql = format!("{QUESTION_SELECT} WHERE q.id = ?1");
            conn.query_row(&sql, [id], question_from_row).optional()
        })
    }

    pub fn question_owner(&self, question_id: i64) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT user_id FROM questions WHERE id = ?1",
                [question_id],
                |row| row.get(0),
            )
            .optional()
        })
    }

    // -- Answers --

    pub fn insert_answer(&self, question_id: i64, content: &str, user_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO answers (question_id, content, user_id) VALUES (?1, ?2, ?3)",
                params![question_id, content, user_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_answer(&self, id: i64) -> Result<Option<AnswerRow>> {
        self.with_conn(|conn| {
            let sql = format!("{ANSWER_SELECT} WHERE a.id = ?1");
            conn.query_row(&sql, [id], answer_from_row).optional()
        })
    }

    /// Answers to a question: accepted first, then by votes, then oldest first.
    pub fn answers_for_question(&self, question_id: i64) -> Result<Vec<AnswerRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{ANSWER_SELECT} WHERE a.question_id = ?1
                 ORDER BY a.is_accepted DESC, a.votes DESC, a.created_at ASC, a.id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([question_id], answer_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Apply a signed delta to an answer's vote counter.
    ///
    /// The read and the write share one transaction; a total outside the
    /// i64 range is refused rather than stored.
    pub fn add_vote(&self, answer_id: i64, delta: i64) -> Result<VoteOutcome> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            let current: Option<i64> = tx
                .query_row("SELECT votes FROM answers WHERE id = ?1", [answer_id], |row| {
                    row.get(0)
                })
                .optional()?;

            let outcome = match current.map(|votes| votes.checked_add(delta)) {
                None => VoteOutcome::AnswerNotFound,
                Some(None) => VoteOutcome::Overflow,
                Some(Some(total)) => {
                    tx.execute(
                        "UPDATE answers SET votes = ?1 WHERE id = ?2",
                        params![total, answer_id],
                    )?;
                    VoteOutcome::Recorded(total)
                }
            };

            tx.commit()?;
            Ok(outcome)
        })
    }

    /// Mark an answer accepted if `user_id` owns the answer's question.
    ///
    /// The ownership read and the update run in one transaction under the
    /// connection lock. Other accepted answers on the question are untouched.
    pub fn accept_answer(&self, answer_id: i64, user_id: i64) -> Result<AcceptOutcome> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            let owner: Option<i64> = tx
                .query_row(
                    "SELECT q.user_id FROM answers a
                     JOIN questions q ON q.id = a.question_id
                     WHERE a.id = ?1",
                    [answer_id],
                    |row| row.get(0),
                )
                .optional()?;

            let outcome = match owner {
                None => AcceptOutcome::AnswerNotFound,
                Some(owner) if owner != user_id => AcceptOutcome::NotOwner,
                Some(_) => {
                    tx.execute("UPDATE answers SET is_accepted = 1 WHERE id = ?1", [answer_id])?;
                    AcceptOutcome::Accepted
                }
            };

            tx.commit()?;
            Ok(outcome)
        })
    }

    // -- Notifications --

    pub fn insert_notification(&self, user_id: i64, message: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications (user_id, message) VALUES (?1, ?2)",
                params![user_id, message],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// A user's notifications, most recent first.
    pub fn notifications_for_user(&self, user_id: i64) -> Result<Vec<NotificationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, message, is_read, created_at
                 FROM notifications
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(NotificationRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        message: row.get(2)?,
                        is_read: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns false when the notification does not exist.
    pub fn mark_notification_read(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("UPDATE notifications SET is_read = 1 WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    /// Insert `message` once for every user that is not banned.
    /// Returns the number of notifications created.
    pub fn broadcast_notification(&self, message: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO notifications (user_id, message)
                 SELECT id, ?1 FROM users WHERE role != ?2",
                params![message, Role::Banned.as_str()],
            )?;
            Ok(inserted)
        })
    }
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    conn.query_row(&sql, [id], user_from_row).optional()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    let role: String = row.get(3)?;
    let role = role.parse::<Role>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        role,
        created_at: row.get(4)?,
    })
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok(QuestionRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        tags: row.get(3)?,
        user_id: row.get(4)?,
        username: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn answer_from_row(row: &Row<'_>) -> rusqlite::Result<AnswerRow> {
    Ok(AnswerRow {
        id: row.get(0)?,
        question_id: row.get(1)?,
        content: row.get(2)?,
        user_id: row.get(3)?,
        username: row
            .get::<_, Option<String>>(4)?
            .unwrap_or_else(|| "unknown".to_string()),
        votes: row.get(5)?,
        is_accepted: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
