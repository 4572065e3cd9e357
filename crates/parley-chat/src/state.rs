//! Application state composition.
//!
//! `AppState` combines the conversation, the staged attachments, the session
//! directory cache and the transient edit/delete slots. Each piece is owned
//! exclusively here and mutated only by the reducer.

use parley_core::types::Message;

use crate::directory::DirectoryState;
use crate::edit::SessionEdit;
use crate::staging::StagingBuffer;

/// Combined client state.
#[derive(Debug, Default)]
pub struct AppState {
    pub conversation: ConversationState,
    pub staging: StagingBuffer,
    pub directory: DirectoryState,
    /// Rename-in-progress for one session row; absent means every row is
    /// in its viewing state.
    pub edit: Option<SessionEdit>,
    /// Session id armed for deletion, awaiting confirmation.
    pub pending_delete: Option<String>,
    /// Diagnostics for the presentation layer to drain and show.
    notices: Vec<String>,
}

impl AppState {
    pub fn push_notice(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
    }

    /// Hands out accumulated diagnostics, clearing the queue.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

/// The current conversation: message sequence, bound session identity and
/// the single-flight send flag.
#[derive(Debug, Default)]
pub struct ConversationState {
    /// Ordered message sequence; append-only while a session is active,
    /// wholesale-replaced on a successful switch.
    pub messages: Vec<Message>,
    /// Server-issued session identity. `None` until the first send of a
    /// fresh conversation binds it.
    pub session_id: Option<String>,
    /// True while a send is outstanding; further sends are rejected.
    pub busy: bool,
    /// Selection key of the outstanding history fetch. Late responses whose
    /// key no longer matches are discarded.
    pub pending_switch: Option<String>,
}
