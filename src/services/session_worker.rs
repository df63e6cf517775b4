use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    errors::AppResult,
    models::domain::SessionStatus,
    repositories::SessionRepository,
};

/// Background reaper for timed sessions. Roughly once per second it
/// recomputes each active session's remaining time from (start_time,
/// duration_minutes, now) and completes the ones that have run out. The
/// status check inside `end` keeps the transition one-shot even if a poll
/// races an admin's manual end.
pub struct SessionWorker {
    sessions: Arc<dyn SessionRepository>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
    poll_interval: Duration,
}

impl SessionWorker {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self {
            sessions,
            handle: Arc::new(RwLock::new(None)),
            poll_interval: Duration::from_secs(1),
        }
    }

    #[cfg(test)]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub async fn start(&self) {
        let mut guard = self.handle.write().await;
        if guard.is_some() {
            return;
        }

        let sessions = Arc::clone(&self.sessions);
        let interval = self.poll_interval;

        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(err) = Self::sweep(&sessions).await {
                    log::error!("Session sweep failed: {}", err);
                }
            }
        }));
        log::info!("Session expiry worker started");
    }

    pub async fn stop(&self) {
        if let Some(handle) = self.handle.write().await.take() {
            handle.abort();
            log::info!("Session expiry worker stopped");
        }
    }

    /// One pass: end every active session whose deadline has passed.
    pub async fn sweep(sessions: &Arc<dyn SessionRepository>) -> AppResult<usize> {
        let now = Utc::now();
        let active = sessions.list_by_status(SessionStatus::Active).await?;

        let mut ended = 0;
        for mut session in active {
            if !session.is_expired(now) {
                continue;
            }
            if session.end(now)? {
                let id = session.id.clone();
                sessions.update(session).await?;
                log::info!("Session {} expired and was completed", id);
                ended += 1;
            }
        }
        Ok(ended)
    }
}
