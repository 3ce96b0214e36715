//! Wire protocol: JSON text frames of the form `{cmd, data}`.
//!
//! Outbound frames also carry a `gid` group id, always empty for a single
//! chat client. Inbound frames are dispatched on `cmd`; anything other than
//! `create` and `error` is surfaced as `Unknown` and ignored by the session.

use achat_common::SessionError;
use serde::{Deserialize, Serialize};

/// Prefix of a message the user typed.
pub const PROBLEM_PREFIX: &str = "问：";
/// Prefix of a message the assistant streamed back.
pub const ANSWER_PREFIX: &str = "答：";

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Create,
    Stop,
}

/// Static identifying fields attached to every create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_uuid: String,
    pub from: String,
    pub pid: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            user_uuid: "user_uuid".into(),
            from: "achat".into(),
            pid: "GoWeaviateDeepseek".into(),
        }
    }
}

/// Payload of a `create` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRequest {
    pub prompt: String,
    pub user_uuid: String,
    pub notify_url: String,
    pub from: String,
    pub chat_uuid: String,
    pub parent_chat_uuid: String,
    pub pid: String,
}

impl CreateRequest {
    /// A fresh request: no parent chat, no notify hook.
    pub fn new(prompt: impl Into<String>, identity: &Identity) -> Self {
        Self {
            prompt: prompt.into(),
            user_uuid: identity.user_uuid.clone(),
            notify_url: String::new(),
            from: identity.from.clone(),
            chat_uuid: String::new(),
            parent_chat_uuid: String::new(),
            pid: identity.pid.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmptyData {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundData {
    Create(CreateRequest),
    Empty(EmptyData),
}

/// A frame sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundFrame {
    pub gid: String,
    pub cmd: Command,
    pub data: OutboundData,
}

impl OutboundFrame {
    pub fn create(request: CreateRequest) -> Self {
        Self {
            gid: String::new(),
            cmd: Command::Create,
            data: OutboundData::Create(request),
        }
    }

    /// Asks the server to cancel the reply it is generating.
    pub fn stop() -> Self {
        Self {
            gid: String::new(),
            cmd: Command::Stop,
            data: OutboundData::Empty(EmptyData::default()),
        }
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::Protocol(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// One streamed piece of a reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateChunk {
    /// Incremental text.
    #[serde(default)]
    pub c: String,
    /// Set on the last chunk of a round trip.
    #[serde(default)]
    pub done: bool,
    /// Batch progress, e.g. `"3/10"`.
    pub chunks: Option<String>,
    /// Workflow step progress, e.g. `"1/1"`.
    pub workflow: Option<String>,
    /// Retrieval sources the server attaches to the final chunk.
    pub db_source: Option<serde_json::Value>,
}

/// A frame received from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Create(CreateChunk),
    Error { detail: Option<String> },
    Unknown(String),
}

#[derive(Deserialize)]
struct RawFrame {
    cmd: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Parse one text frame.
pub fn parse_inbound(text: &str) -> Result<InboundFrame, SessionError> {
    let raw: RawFrame = serde_json::from_str(text)
        .map_err(|e| SessionError::Protocol(format!("malformed frame: {e}")))?;

    match raw.cmd.as_str() {
        "create" => {
            let chunk = serde_json::from_value(raw.data)
                .map_err(|e| SessionError::Protocol(format!("bad create payload: {e}")))?;
            Ok(InboundFrame::Create(chunk))
        }
        "error" => {
            let detail = match raw.data {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s),
                other => Some(other.to_string()),
            };
            Ok(InboundFrame::Error { detail })
        }
        _ => Ok(InboundFrame::Unknown(raw.cmd)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_frame_wire_shape() {
        let frame = OutboundFrame::create(CreateRequest::new("hi", &Identity::default()));
        let value: serde_json::Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "gid": "",
                "cmd": "create",
                "data": {
                    "prompt": "hi",
                    "user_uuid": "user_uuid",
                    "notify_url": "",
                    "from": "achat",
                    "chat_uuid": "",
                    "parent_chat_uuid": "",
                    "pid": "GoWeaviateDeepseek"
                }
            })
        );
    }

    #[test]
    fn stop_frame_wire_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&OutboundFrame::stop().to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"gid": "", "cmd": "stop", "data": {}}));
    }

    #[test]
    fn identity_fields_come_from_config() {
        let identity = Identity {
            user_uuid: "u-42".into(),
            from: "desk".into(),
            pid: "KB".into(),
        };
        let request = CreateRequest::new("q", &identity);
        assert_eq!(request.user_uuid, "u-42");
        assert_eq!(request.from, "desk");
        assert_eq!(request.pid, "KB");
        assert!(request.chat_uuid.is_empty());
    }

    #[test]
    fn parse_create_chunk() {
        let frame = parse_inbound(r#"{"cmd":"create","data":{"c":"A","done":false}}"#).unwrap();
        match frame {
            InboundFrame::Create(chunk) => {
                assert_eq!(chunk.c, "A");
                assert!(!chunk.done);
                assert!(chunk.chunks.is_none());
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn parse_create_with_progress_fields() {
        let frame = parse_inbound(
            r#"{"cmd":"create","data":{"c":"","done":true,"chunks":"2/2","workflow":"1/1","db_source":[{"title":"doc"}]}}"#,
        )
        .unwrap();
        let InboundFrame::Create(chunk) = frame else {
            panic!("expected create");
        };
        assert!(chunk.done);
        assert_eq!(chunk.chunks.as_deref(), Some("2/2"));
        assert_eq!(chunk.workflow.as_deref(), Some("1/1"));
        assert!(chunk.db_source.is_some());
    }

    #[test]
    fn parse_error_frame_with_and_without_detail() {
        assert_eq!(
            parse_inbound(r#"{"cmd":"error"}"#).unwrap(),
            InboundFrame::Error { detail: None }
        );
        assert_eq!(
            parse_inbound(r#"{"cmd":"error","data":"rate limited"}"#).unwrap(),
            InboundFrame::Error {
                detail: Some("rate limited".into())
            }
        );
    }

    #[test]
    fn unknown_cmd_is_not_an_error() {
        assert_eq!(
            parse_inbound(r#"{"cmd":"test-back","data":{}}"#).unwrap(),
            InboundFrame::Unknown("test-back".into())
        );
    }

    #[test]
    fn malformed_frames_are_protocol_errors() {
        assert!(matches!(
            parse_inbound("not json"),
            Err(SessionError::Protocol(_))
        ));
        assert!(matches!(
            parse_inbound(r#"{"data":{}}"#),
            Err(SessionError::Protocol(_))
        ));
        assert!(matches!(
            parse_inbound(r#"{"cmd":"create"}"#),
            Err(SessionError::Protocol(_))
        ));
    }
}
