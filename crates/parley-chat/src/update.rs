//! The chat reducer (update function).
//!
//! All state mutations happen here. The runtime calls
//! `update(state, event)` and executes the returned effects.

use parley_core::types::Message;

use crate::edit::{EditPhase, SessionEdit};
use crate::effects::Effect;
use crate::events::ChatEvent;
use crate::state::AppState;

/// Shown when a send fails and the backend supplied no detail text.
pub const SEND_FAILURE_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(state: &mut AppState, event: ChatEvent) -> Vec<Effect> {
    match event {
        // ====================================================================
        // Conversation
        // ====================================================================
        ChatEvent::Submit { text } => submit(state, &text),
        ChatEvent::SendSucceeded { reply } => {
            let conversation = &mut state.conversation;
            conversation.busy = false;
            // Lazy identity: the first reply of a fresh conversation binds
            // the session id. A bound id is never overwritten.
            if conversation.session_id.is_none() {
                conversation.session_id = Some(reply.session_id);
            }
            conversation.messages.push(Message::assistant(reply.response));
            vec![]
        }
        ChatEvent::SendFailed { detail } => {
            let conversation = &mut state.conversation;
            conversation.busy = false;
            // The failure is surfaced inline; the optimistic user message
            // stays exactly as appended.
            let content = detail.unwrap_or_else(|| SEND_FAILURE_FALLBACK.to_string());
            conversation.messages.push(Message::assistant(content));
            vec![]
        }
        ChatEvent::SwitchSession { session_id } => {
            state.conversation.pending_switch = Some(session_id.clone());
            vec![Effect::LoadHistory { session_id }]
        }
        ChatEvent::HistoryLoaded {
            session_id,
            messages,
        } => {
            let conversation = &mut state.conversation;
            if conversation.pending_switch.as_deref() == Some(session_id.as_str()) {
                conversation.pending_switch = None;
                conversation.messages = messages;
                conversation.session_id = Some(session_id);
            } else {
                // The selection moved on while this fetch was in flight.
                tracing::debug!(%session_id, "discarding stale history response");
            }
            vec![]
        }
        ChatEvent::HistoryFailed { session_id, error } => {
            let conversation = &mut state.conversation;
            if conversation.pending_switch.as_deref() == Some(session_id.as_str()) {
                conversation.pending_switch = None;
            }
            tracing::warn!(%session_id, %error, "history fetch failed");
            state.push_notice(format!("Failed to load session {session_id}: {error}"));
            vec![]
        }
        ChatEvent::NewChat => {
            let conversation = &mut state.conversation;
            conversation.session_id = None;
            conversation.messages.clear();
            conversation.pending_switch = None;
            vec![]
        }

        // ====================================================================
        // Attachment staging
        // ====================================================================
        ChatEvent::AttachFiles { paths } => {
            if paths.is_empty() {
                return vec![];
            }
            vec![Effect::EncodeAttachments { paths }]
        }
        ChatEvent::AttachmentsStaged { batch } => {
            state.staging.stage_batch(batch);
            vec![]
        }
        ChatEvent::StageFailed { error } => {
            state.push_notice(format!("Could not attach files: {error}"));
            vec![]
        }
        ChatEvent::RemoveAttachment { index } => {
            state.staging.remove(index);
            vec![]
        }

        // ====================================================================
        // Session directory
        // ====================================================================
        ChatEvent::SessionsLoaded { sessions } => {
            state.directory.replace(sessions);
            vec![]
        }
        ChatEvent::SessionsFailed { error } => {
            state.directory.note_failure(error);
            vec![]
        }

        // ====================================================================
        // Rename machine
        // ====================================================================
        ChatEvent::BeginRename { session_id } => {
            let current_title = state.directory.title_of(&session_id);
            state.edit = Some(SessionEdit::begin(session_id, current_title));
            vec![]
        }
        ChatEvent::EditDraft { text } => {
            if let Some(edit) = state.edit.as_mut() {
                edit.set_draft(text);
            }
            vec![]
        }
        ChatEvent::CancelRename => {
            state.edit = None;
            vec![]
        }
        ChatEvent::SaveRename => {
            let Some(edit) = state.edit.as_mut() else {
                return vec![];
            };
            if edit.is_saving() {
                return vec![];
            }
            edit.phase = EditPhase::Saving;
            edit.error = None;
            vec![Effect::RenameSession {
                session_id: edit.session_id.clone(),
                title: edit.draft_title.clone(),
            }]
        }
        ChatEvent::RenameCompleted { session_id, result } => match result {
            Ok(()) => {
                if state
                    .edit
                    .as_ref()
                    .is_some_and(|edit| edit.session_id == session_id)
                {
                    state.edit = None;
                }
                vec![Effect::RefreshSessions]
            }
            Err(error) => {
                // Keep the draft and surface the failure so the user can
                // retry instead of silently losing the edit.
                if let Some(edit) = state.edit.as_mut()
                    && edit.session_id == session_id
                {
                    edit.phase = EditPhase::Editing;
                    edit.error = Some(error);
                } else {
                    state.push_notice(format!("Failed to rename session {session_id}: {error}"));
                }
                vec![]
            }
        },

        // ====================================================================
        // Deletion
        // ====================================================================
        ChatEvent::RequestDelete { session_id } => {
            state.pending_delete = Some(session_id);
            vec![]
        }
        ChatEvent::DeclineDelete => {
            state.pending_delete = None;
            vec![]
        }
        ChatEvent::ConfirmDelete => {
            let Some(session_id) = state.pending_delete.take() else {
                return vec![];
            };
            vec![Effect::DeleteSession { session_id }]
        }
        ChatEvent::DeleteCompleted { session_id, result } => {
            if let Err(error) = result {
                state.push_notice(format!("Failed to delete session {session_id}: {error}"));
            }
            vec![Effect::RefreshSessions]
        }
    }
}

/// Send acceptance: validates, appends the optimistic user message, drains
/// the staged attachments and issues exactly one request.
fn submit(state: &mut AppState, text: &str) -> Vec<Effect> {
    let trimmed = text.trim();

    if state.conversation.busy {
        // Single-flight: concurrent sends are rejected, not queued.
        tracing::debug!("send already in flight; input rejected");
        return vec![];
    }
    if trimmed.is_empty() && state.staging.is_empty() {
        return vec![];
    }

    let attachments = state.staging.drain();
    let conversation = &mut state.conversation;
    conversation
        .messages
        .push(optimistic_user_message(trimmed, attachments.len()));
    conversation.busy = true;

    vec![Effect::SendMessage {
        text: trimmed.to_string(),
        session_id: conversation.session_id.clone(),
        attachments,
    }]
}

/// Echoes the submitted text, with a marker for staged attachments.
fn optimistic_user_message(text: &str, attachment_count: usize) -> Message {
    if attachment_count == 0 {
        return Message::user(text);
    }
    let plural = if attachment_count == 1 { "" } else { "s" };
    let marker = format!("[{attachment_count} attachment{plural}]");
    if text.is_empty() {
        Message::user(marker)
    } else {
        Message::user(format!("{text} {marker}"))
    }
}
