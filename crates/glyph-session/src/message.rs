//! Messages carried over the engine channel.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request sent to the evaluation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub action_name: String,
    pub payload: String,
}

impl Request {
    pub fn new(action_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            payload: payload.into(),
        }
    }

    /// Encode as one line of JSON, without the trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Message emitted by the evaluation engine.
///
/// Unknown kinds are kept with their raw payload. A missing `result`
/// field reads as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireReply", into = "WireReply")]
pub enum Reply {
    /// Kind `"result"`.
    Result(String),
    /// Kind `"error"`.
    Error(String),
    Other { kind: String, result: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireReply {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    result: String,
}

impl From<WireReply> for Reply {
    fn from(wire: WireReply) -> Self {
        match wire.kind.as_str() {
            "result" => Reply::Result(wire.result),
            "error" => Reply::Error(wire.result),
            _ => Reply::Other {
                kind: wire.kind,
                result: wire.result,
            },
        }
    }
}

impl From<Reply> for WireReply {
    fn from(reply: Reply) -> Self {
        match reply {
            Reply::Result(result) => WireReply {
                kind: "result".to_string(),
                result,
            },
            Reply::Error(result) => WireReply {
                kind: "error".to_string(),
                result,
            },
            Reply::Other { kind, result } => WireReply { kind, result },
        }
    }
}

impl Reply {
    pub fn kind(&self) -> &str {
        match self {
            Reply::Result(_) => "result",
            Reply::Error(_) => "error",
            Reply::Other { kind, .. } => kind,
        }
    }

    pub fn result(&self) -> &str {
        match self {
            Reply::Result(result) | Reply::Error(result) | Reply::Other { result, .. } => result,
        }
    }

    pub fn into_result(self) -> String {
        match self {
            Reply::Result(result) | Reply::Error(result) | Reply::Other { result, .. } => result,
        }
    }

    /// Decode one line of engine output.
    ///
    /// Never fails: a line that is not a reply object is passed through as
    /// the result of an untyped reply.
    pub fn parse(line: &str) -> Self {
        match serde_json::from_str(line) {
            Ok(reply) => reply,
            Err(err) => {
                debug!("engine output is not a reply object: {}", err);
                Reply::Other {
                    kind: String::new(),
                    result: line.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = Request::new("editor", "1+1");
        assert_eq!(
            request.to_json().unwrap(),
            r#"{"actionName":"editor","payload":"1+1"}"#
        );
    }

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(
            Reply::parse(r#"{"kind":"result","result":"2"}"#),
            Reply::Result("2".to_string())
        );
        assert_eq!(
            Reply::parse(r#"{"kind":"error","result":"boom"}"#),
            Reply::Error("boom".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_kind_keeps_payload() {
        let reply = Reply::parse(r#"{"kind":"progress","result":"50%","extra":1}"#);
        assert_eq!(reply.kind(), "progress");
        assert_eq!(reply.result(), "50%");
    }

    #[test]
    fn test_parse_missing_fields() {
        let reply = Reply::parse(r#"{"kind":"result"}"#);
        assert_eq!(reply, Reply::Result(String::new()));

        let reply = Reply::parse("{}");
        assert_eq!(reply.kind(), "");
        assert_eq!(reply.result(), "");
    }

    #[test]
    fn test_parse_malformed_line() {
        let reply = Reply::parse("Segmentation fault");
        assert_eq!(reply.kind(), "");
        assert_eq!(reply.into_result(), "Segmentation fault");
    }

    #[test]
    fn test_reply_serializes_flat() {
        let json = serde_json::to_value(Reply::Result("2".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "result", "result": "2"}));
    }
}
