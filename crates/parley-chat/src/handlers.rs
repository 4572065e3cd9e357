//! Effect handlers.
//!
//! Pure async functions: each performs one backend call (or encoding job)
//! and returns the resulting `ChatEvent`. The runtime spawns them and sends
//! the result to the inbox. Handlers never fail; both outcomes of the
//! underlying call map to an event, so state can always settle.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::api::ApiClient;
use parley_core::attachments;
use parley_core::types::Attachment;

use crate::events::ChatEvent;

pub async fn send_message(
    client: Arc<ApiClient>,
    text: String,
    session_id: Option<String>,
    attachments: Vec<Attachment>,
) -> ChatEvent {
    match client
        .send_message(&text, session_id.as_deref(), &attachments)
        .await
    {
        Ok(reply) => ChatEvent::SendSucceeded { reply },
        Err(err) => {
            tracing::warn!(error = %err, "send failed");
            ChatEvent::SendFailed {
                detail: err.detail().map(str::to_string),
            }
        }
    }
}

pub async fn load_history(client: Arc<ApiClient>, session_id: String) -> ChatEvent {
    match client.session_history(&session_id).await {
        Ok(messages) => ChatEvent::HistoryLoaded {
            session_id,
            messages,
        },
        Err(err) => ChatEvent::HistoryFailed {
            session_id,
            error: err.to_string(),
        },
    }
}

pub async fn refresh_sessions(client: Arc<ApiClient>) -> ChatEvent {
    match client.list_sessions().await {
        Ok(sessions) => ChatEvent::SessionsLoaded { sessions },
        Err(err) => ChatEvent::SessionsFailed {
            error: err.to_string(),
        },
    }
}

pub async fn rename_session(
    client: Arc<ApiClient>,
    session_id: String,
    title: String,
) -> ChatEvent {
    let result = client
        .rename_session(&session_id, &title)
        .await
        .map(|_| ())
        .map_err(|err| err.to_string());
    ChatEvent::RenameCompleted { session_id, result }
}

pub async fn delete_session(client: Arc<ApiClient>, session_id: String) -> ChatEvent {
    let result = client
        .delete_session(&session_id)
        .await
        .map_err(|err| err.to_string());
    ChatEvent::DeleteCompleted { session_id, result }
}

pub async fn stage_attachments(paths: Vec<PathBuf>, max_bytes: u64) -> ChatEvent {
    match attachments::encode_batch(paths, max_bytes).await {
        Ok(batch) => ChatEvent::AttachmentsStaged { batch },
        Err(err) => ChatEvent::StageFailed {
            error: format!("{err:#}"),
        },
    }
}
