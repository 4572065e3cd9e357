//! Effects returned by the reducer for the runtime to execute.
//!
//! Effects represent I/O and task spawning only; the reducer stays pure and
//! never performs network calls itself.

use std::path::PathBuf;

use parley_core::types::Attachment;

/// Command for the runtime.
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    /// Issue the one request of an accepted send.
    SendMessage {
        text: String,
        session_id: Option<String>,
        attachments: Vec<Attachment>,
    },

    /// Fetch the history of a session (for a switch).
    LoadHistory { session_id: String },

    /// Encode a selection of files into one attachment batch.
    EncodeAttachments { paths: Vec<PathBuf> },

    /// Force an immediate session list refresh.
    RefreshSessions,

    /// Rename a session.
    RenameSession { session_id: String, title: String },

    /// Delete a session.
    DeleteSession { session_id: String },
}
