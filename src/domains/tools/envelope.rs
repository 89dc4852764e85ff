//! Wire-level request and result types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An incoming call: operation name plus untyped arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub operation: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// Failure classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnknownOperation,
    InvalidArguments,
    ToolExecutionError,
    CollaboratorUnavailable,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownOperation => "UnknownOperation",
            Self::InvalidArguments => "InvalidArguments",
            Self::ToolExecutionError => "ToolExecutionError",
            Self::CollaboratorUnavailable => "CollaboratorUnavailable",
            Self::InternalError => "InternalError",
        }
    }
}

/// The uniform result of every invocation.
///
/// Serializes as `{"ok": true, "result": ...}` or
/// `{"ok": false, "error_kind": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireEnvelope", try_from = "WireEnvelope")]
pub enum Envelope {
    Ok(Value),
    Err { kind: ErrorKind, message: String },
}

impl Envelope {
    pub fn ok(result: Value) -> Self {
        Self::Ok(result)
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Err {
            kind,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The error kind, if this is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Ok(_) => None,
            Self::Err { kind, .. } => Some(*kind),
        }
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> Value {
        Value::from(WireEnvelope::from(self.clone()))
    }
}

#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl From<Envelope> for WireEnvelope {
    fn from(envelope: Envelope) -> Self {
        match envelope {
            Envelope::Ok(result) => Self {
                ok: true,
                result: Some(result),
                error_kind: None,
                message: None,
            },
            Envelope::Err { kind, message } => Self {
                ok: false,
                result: None,
                error_kind: Some(kind),
                message: Some(message),
            },
        }
    }
}

impl From<WireEnvelope> for Value {
    fn from(wire: WireEnvelope) -> Self {
        let mut map = Map::new();
        map.insert("ok".into(), Value::Bool(wire.ok));
        if wire.ok {
            map.insert("result".into(), wire.result.unwrap_or(Value::Null));
        } else {
            if let Some(kind) = wire.error_kind {
                map.insert("error_kind".into(), Value::String(kind.as_str().into()));
            }
            map.insert("message".into(), Value::String(wire.message.unwrap_or_default()));
        }
        Value::Object(map)
    }
}

impl TryFrom<WireEnvelope> for Envelope {
    type Error = String;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        if wire.ok {
            return Ok(Self::Ok(wire.result.unwrap_or(Value::Null)));
        }
        let kind = wire
            .error_kind
            .ok_or_else(|| "failure envelope without error_kind".to_string())?;
        Ok(Self::Err {
            kind,
            message: wire.message.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_wire_shape() {
        let envelope = Envelope::ok(json!({ "converted": 0.0 }));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "ok": true, "result": { "converted": 0.0 } })
        );
        assert_eq!(envelope.to_value(), serde_json::to_value(&envelope).unwrap());
    }

    #[test]
    fn test_failure_wire_shape() {
        let envelope = Envelope::error(ErrorKind::InvalidArguments, "missing argument: to_unit");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "ok": false,
                "error_kind": "InvalidArguments",
                "message": "missing argument: to_unit"
            })
        );
    }

    #[test]
    fn test_null_result_is_kept() {
        let text = serde_json::to_string(&Envelope::ok(Value::Null)).unwrap();
        assert_eq!(text, r#"{"ok":true,"result":null}"#);
        let back: Envelope = serde_json::from_str(&text).unwrap();
        assert_eq!(back, Envelope::ok(Value::Null));
    }

    #[test]
    fn test_failure_without_kind_rejected() {
        assert!(serde_json::from_value::<Envelope>(json!({ "ok": false, "message": "x" })).is_err());
    }

    #[test]
    fn test_request_arguments_default_to_empty() {
        let request: InvocationRequest = serde_json::from_value(json!({ "operation": "nope" })).unwrap();
        assert!(request.arguments.is_empty());
    }
}
