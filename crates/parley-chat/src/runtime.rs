//! Chat runtime - owns the client, runs the reducer, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//!
//! ## Inbox Pattern
//!
//! Handlers send `ChatEvent`s to the inbox channel; the presentation loop
//! receives them from the `Receiver` returned by [`ChatRuntime::new`] and
//! feeds them back through [`ChatRuntime::dispatch`]. The session directory
//! poller shares the same inbox, so every async result funnels through one
//! place.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parley_core::api::ApiClient;
use tokio::sync::mpsc;

use crate::directory::DirectoryPoller;
use crate::effects::Effect;
use crate::events::ChatEvent;
use crate::state::AppState;
use crate::{handlers, update};

pub struct ChatRuntime {
    client: Arc<ApiClient>,
    pub state: AppState,
    inbox_tx: mpsc::UnboundedSender<ChatEvent>,
    poller: Option<DirectoryPoller>,
    max_attachment_bytes: u64,
}

impl ChatRuntime {
    /// Creates a runtime and the inbox receiver the owning loop drains.
    pub fn new(
        client: Arc<ApiClient>,
        max_attachment_bytes: u64,
    ) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let runtime = Self {
            client,
            state: AppState::default(),
            inbox_tx,
            poller: None,
            max_attachment_bytes,
        };
        (runtime, inbox_rx)
    }

    /// Starts the session directory poll task. Idempotent.
    ///
    /// The task polls immediately, then on every `period` tick, and stops
    /// when [`ChatRuntime::stop_directory`] is called (or the runtime is
    /// dropped).
    pub fn start_directory(&mut self, period: Duration) {
        if self.poller.is_some() {
            return;
        }
        self.poller = Some(DirectoryPoller::spawn(
            Arc::clone(&self.client),
            period,
            self.inbox_tx.clone(),
        ));
    }

    /// Cancels the session directory poll task.
    pub fn stop_directory(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.shutdown();
        }
    }

    /// Runs the reducer and executes the returned effects.
    pub fn dispatch(&mut self, event: ChatEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::SendMessage {
                text,
                session_id,
                attachments,
            } => {
                let client = Arc::clone(&self.client);
                self.spawn_event(handlers::send_message(client, text, session_id, attachments));
            }
            Effect::LoadHistory { session_id } => {
                let client = Arc::clone(&self.client);
                self.spawn_event(handlers::load_history(client, session_id));
            }
            Effect::EncodeAttachments { paths } => {
                self.spawn_event(handlers::stage_attachments(paths, self.max_attachment_bytes));
            }
            Effect::RefreshSessions => {
                // With an active poller the refresh runs through its loop,
                // keeping list requests serialized; otherwise it is a
                // one-shot fetch.
                if let Some(poller) = &self.poller {
                    poller.refresh_now();
                } else {
                    let client = Arc::clone(&self.client);
                    self.spawn_event(handlers::refresh_sessions(client));
                }
            }
            Effect::RenameSession { session_id, title } => {
                let client = Arc::clone(&self.client);
                self.spawn_event(handlers::rename_session(client, session_id, title));
            }
            Effect::DeleteSession { session_id } => {
                let client = Arc::clone(&self.client);
                self.spawn_event(handlers::delete_session(client, session_id));
            }
        }
    }

    /// Spawns a handler and sends its result event to the inbox.
    fn spawn_event<F>(&self, handler: F)
    where
        F: Future<Output = ChatEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(handler.await);
        });
    }
}

impl Drop for ChatRuntime {
    fn drop(&mut self) {
        self.stop_directory();
    }
}
