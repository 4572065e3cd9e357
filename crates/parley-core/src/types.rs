//! Wire types shared with the backend service.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Title shown for sessions the backend has not named yet.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single conversation message.
///
/// Backend history entries carry extra bookkeeping fields (timestamps,
/// session ids); those are ignored on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A file staged for transmission, carried inline as base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: String,
}

/// One row of the session directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_utc")]
    pub created_at: DateTime<Utc>,
}

impl SessionSummary {
    /// Title for display, falling back to the backend's default.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_SESSION_TITLE)
    }
}

/// Response body of a send-message call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: String,
    pub response: String,
}

/// Response body of a history fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub chats: Vec<Message>,
}

/// Accepts both RFC 3339 and the backend's timezone-naive ISO form.
///
/// The backend serializes `datetime.now()` without an offset; naive values
/// are taken as UTC.
fn deserialize_loose_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_loose_utc(&raw).map_err(serde::de::Error::custom)
}

fn parse_loose_utc(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let ts = parse_loose_utc("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00+00:00");

        let offset = parse_loose_utc("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2024-01-15T08:30:00+00:00");
    }

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let ts = parse_loose_utc("2024-01-15T10:30:00.123456").unwrap();
        assert_eq!(ts.timestamp(), 1_705_314_600);

        let no_frac = parse_loose_utc("2024-01-15T10:30:00").unwrap();
        assert_eq!(no_frac.timestamp(), 1_705_314_600);
    }

    #[test]
    fn test_parse_garbage_timestamp_fails() {
        assert!(parse_loose_utc("yesterday").is_err());
    }

    #[test]
    fn test_session_summary_display_title() {
        let json = r#"{"session_id":"abc","title":null,"created_at":"2024-01-15T10:30:00"}"#;
        let session: SessionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(session.display_title(), "New Chat");

        let json = r#"{"session_id":"abc","title":"Trip notes","created_at":"2024-01-15T10:30:00Z"}"#;
        let session: SessionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(session.display_title(), "Trip notes");
    }

    #[test]
    fn test_history_message_ignores_extra_fields() {
        let json = r#"{"chats":[
            {"role":"user","content":"hi","timestamp":"2024-01-15T10:30:00","session_id":"abc","attachments":null},
            {"role":"assistant","content":"hello"}
        ]}"#;
        let history: HistoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(history.chats.len(), 2);
        assert_eq!(history.chats[0], Message::user("hi"));
        assert_eq!(history.chats[1].role, Role::Assistant);
    }
}
