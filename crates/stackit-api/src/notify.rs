use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use stackit_db::Database;

/// Work items for the notification worker.
#[derive(Debug, Clone)]
pub enum Notice {
    /// Tell the owner of `question_id` that `answerer_id` posted an answer.
    NewAnswer { question_id: i64, answerer_id: i64 },
}

/// Best-effort notification delivery.
///
/// Handlers enqueue a notice after their own insert has committed and return
/// without waiting. The worker applies notices in enqueue order; a failed
/// delivery is logged and dropped.
#[derive(Clone)]
pub struct NotificationSink {
    tx: mpsc::UnboundedSender<Notice>,
}

impl NotificationSink {
    /// Start the worker on the current Tokio runtime. The worker exits once
    /// every clone of the returned sink has been dropped and the queue is
    /// drained.
    pub fn spawn(db: Arc<Database>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(db, rx));
        (Self { tx }, handle)
    }

    pub fn send(&self, notice: Notice) {
        if let Err(e) = self.tx.send(notice) {
            warn!("Notification worker is gone, dropping {:?}", e.0);
        }
    }
}

async fn run_worker(db: Arc<Database>, mut rx: mpsc::UnboundedReceiver<Notice>) {
    while let Some(notice) = rx.recv().await {
        let db = db.clone();
        match tokio::task::spawn_blocking(move || deliver(&db, notice)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Notification delivery failed: {:#}", e),
            Err(e) => error!("spawn_blocking join error: {}", e),
        }
    }
    debug!("Notification worker stopped");
}

fn deliver(db: &Database, notice: Notice) -> anyhow::Result<()> {
    match notice {
        Notice::NewAnswer { question_id, answerer_id } => {
            let Some(owner) = db.question_owner(question_id)? else {
                warn!("Question {} vanished before notifying its owner", question_id);
                return Ok(());
            };
            let message = format!("New answer on your question by user {}", answerer_id);
            db.insert_notification(owner, &message)?;
        }
    }
    Ok(())
}
