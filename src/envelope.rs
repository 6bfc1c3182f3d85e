//! Response Envelope
//!
//! Uniform success/error wrapper returned by every ledger operation, and its text
//! rendering. Rendering never fails: when structured serialization breaks, a degraded
//! but still well-formed JSON object is produced instead.

use crate::error::OperationError;
use serde::Serialize;

/// Result of one operation, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope {
    /// `payload` is pre-serialized JSON embedded verbatim; `message` is plain text.
    Success {
        payload: Option<String>,
        message: Option<String>,
    },
    Error { message: String, code: String },
}

/// Wire shape of a plain success or error envelope.
#[derive(Serialize)]
struct PlainBody<'a> {
    message: &'a str,
    code: &'a str,
    #[serde(rename = "OK")]
    ok: bool,
}

impl ResponseEnvelope {
    pub fn success(message: impl Into<String>) -> Self {
        ResponseEnvelope::Success {
            payload: None,
            message: Some(message.into()),
        }
    }

    pub fn success_with_payload(payload: impl Into<String>) -> Self {
        ResponseEnvelope::Success {
            payload: Some(payload.into()),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>, code: impl Into<String>) -> Self {
        ResponseEnvelope::Error {
            message: message.into(),
            code: code.into(),
        }
    }

    /// Render to text. The boolean is the `OK` flag actually written, which is false
    /// for error envelopes and for any envelope that fell back to degraded text.
    pub fn render(&self) -> (String, bool) {
        self.render_with(|body| serde_json::to_string(body).map_err(|e| e.to_string()))
    }

    fn render_with<F>(&self, encode: F) -> (String, bool)
    where
        F: Fn(&PlainBody<'_>) -> Result<String, String>,
    {
        match self {
            ResponseEnvelope::Success {
                payload: Some(payload),
                ..
            } => (format!("{{\"message\":{}, \"OK\":true}}", payload), true),
            ResponseEnvelope::Success {
                payload: None,
                message,
            } => {
                let message = message.as_deref().unwrap_or("");
                let body = PlainBody {
                    message,
                    code: "",
                    ok: true,
                };
                match encode(&body) {
                    Ok(text) => (text, true),
                    Err(reason) => (degraded_success(&reason, message), false),
                }
            }
            ResponseEnvelope::Error { message, code } => {
                let body = PlainBody {
                    message,
                    code,
                    ok: false,
                };
                match encode(&body) {
                    Ok(text) => (text, false),
                    Err(reason) => (degraded_error(&reason, message, code), false),
                }
            }
        }
    }
}

impl From<&OperationError> for ResponseEnvelope {
    fn from(err: &OperationError) -> Self {
        ResponseEnvelope::error(err.to_string(), err.code())
    }
}

/// Fallback text for a success whose encoding failed. Reported with `OK=false`.
fn degraded_success(reason: &str, message: &str) -> String {
    format!(
        "{{\"message\":\"{} BUT {} (NO COMMIT)\", \"OK\":false}}",
        escape_json(reason),
        escape_json(message)
    )
}

fn degraded_error(reason: &str, message: &str, code: &str) -> String {
    format!(
        "{{\"code\":\"{}\", \"message\":\"{} AND {}\", \"OK\":false}}",
        escape_json(code),
        escape_json(reason),
        escape_json(message)
    )
}

/// Minimal string escaping for the fallback path, which must not depend on the encoder
/// that just failed.
fn escape_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
