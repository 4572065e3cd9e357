//! Session directory: cached session list plus its poll task.
//!
//! The cache is replaced in full by every poll result; it is never diffed
//! or merged against local edits, so whichever response is processed last
//! wins. The poll task is started explicitly when the chat view activates
//! and cancelled when it is torn down.

use std::sync::Arc;
use std::time::Duration;

use parley_core::api::ApiClient;
use parley_core::types::SessionSummary;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::ChatEvent;

/// Cached session list.
#[derive(Debug, Default)]
pub struct DirectoryState {
    sessions: Vec<SessionSummary>,
    last_error: Option<String>,
}

impl DirectoryState {
    /// Replaces the whole cache with a fresh poll result.
    pub fn replace(&mut self, sessions: Vec<SessionSummary>) {
        self.sessions = sessions;
        self.last_error = None;
    }

    /// Records a failed poll. The cached list stays untouched.
    pub fn note_failure(&mut self, error: String) {
        tracing::warn!(%error, "session list poll failed");
        self.last_error = Some(error);
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn get(&self, index: usize) -> Option<&SessionSummary> {
        self.sessions.get(index)
    }

    /// Stored title of a session, if the row is cached and titled.
    pub fn title_of(&self, session_id: &str) -> Option<String> {
        self.sessions
            .iter()
            .find(|s| s.session_id == session_id)
            .and_then(|s| s.title.clone())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Handle to the spawned poll task.
///
/// Polls immediately on spawn, then on every period tick, and on every
/// [`DirectoryPoller::refresh_now`] nudge. Results are delivered as
/// [`ChatEvent::SessionsLoaded`] / [`ChatEvent::SessionsFailed`]. Dropping
/// the handle cancels the task.
#[derive(Debug)]
pub struct DirectoryPoller {
    cancel: CancellationToken,
    refresh_tx: mpsc::UnboundedSender<()>,
}

impl DirectoryPoller {
    pub fn spawn(
        client: Arc<ApiClient>,
        period: Duration,
        events: mpsc::UnboundedSender<ChatEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<()>();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            // First tick fires immediately: the list is polled as soon as
            // the view becomes active.
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                    nudge = refresh_rx.recv() => {
                        if nudge.is_none() {
                            break;
                        }
                    }
                }

                let event = match client.list_sessions().await {
                    Ok(sessions) => ChatEvent::SessionsLoaded { sessions },
                    Err(err) => ChatEvent::SessionsFailed {
                        error: err.to_string(),
                    },
                };
                if events.send(event).is_err() {
                    break;
                }
            }
            tracing::debug!("session directory poller stopped");
        });

        Self { cancel, refresh_tx }
    }

    /// Forces an immediate poll, so a rename/delete shows up without
    /// waiting for the next tick.
    pub fn refresh_now(&self) {
        let _ = self.refresh_tx.send(());
    }

    /// Stops the poll task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for DirectoryPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
