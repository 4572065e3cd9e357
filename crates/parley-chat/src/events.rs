//! Events consumed by the chat reducer.
//!
//! User intents and async results alike flow through here; the reducer is
//! the only place state changes.

use std::path::PathBuf;

use parley_core::types::{Attachment, ChatReply, Message, SessionSummary};

/// Input to the reducer.
#[derive(Debug)]
pub enum ChatEvent {
    // ========================================================================
    // Conversation
    // ========================================================================
    /// User submitted the composed input.
    Submit { text: String },
    /// The outstanding send completed.
    SendSucceeded { reply: ChatReply },
    /// The outstanding send failed; `detail` is the backend's text, if any.
    SendFailed { detail: Option<String> },
    /// User selected a session row.
    SwitchSession { session_id: String },
    /// History fetch finished for `session_id`.
    HistoryLoaded {
        session_id: String,
        messages: Vec<Message>,
    },
    /// History fetch failed for `session_id`.
    HistoryFailed { session_id: String, error: String },
    /// User started a fresh conversation.
    NewChat,

    // ========================================================================
    // Attachment staging
    // ========================================================================
    /// User selected files to attach.
    AttachFiles { paths: Vec<PathBuf> },
    /// A whole selection batch finished encoding.
    AttachmentsStaged { batch: Vec<Attachment> },
    /// A selection batch failed to encode; nothing was staged.
    StageFailed { error: String },
    /// User removed a staged attachment by position.
    RemoveAttachment { index: usize },

    // ========================================================================
    // Session directory
    // ========================================================================
    /// A poll or refresh delivered a fresh session list.
    SessionsLoaded { sessions: Vec<SessionSummary> },
    /// A poll or refresh failed; the cached list stays as-is.
    SessionsFailed { error: String },

    // ========================================================================
    // Rename machine
    // ========================================================================
    /// User started renaming a session row.
    BeginRename { session_id: String },
    /// User changed the draft title (local only).
    EditDraft { text: String },
    /// User abandoned the rename (local only).
    CancelRename,
    /// User confirmed the draft.
    SaveRename,
    /// The rename call completed.
    RenameCompleted {
        session_id: String,
        result: Result<(), String>,
    },

    // ========================================================================
    // Deletion
    // ========================================================================
    /// User asked to delete a session; arms the confirmation gate.
    RequestDelete { session_id: String },
    /// User confirmed the pending deletion.
    ConfirmDelete,
    /// User declined the pending deletion.
    DeclineDelete,
    /// The delete call completed.
    DeleteCompleted {
        session_id: String,
        result: Result<(), String>,
    },
}
