//! Normalized failure payloads and the failure-channel contract.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Application error codes used for locally synthesized failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Unknown = 0,
    Connection = 1,
    InvalidCredentials = 2,
    InvalidRequest = 3,
    NotFound = 4,
    InvalidResponse = 5,
    Server = 6,
    ServerUnavailable = 7,
    Timeout = 8,
    UnsupportedUrl = 9,
}

impl ErrorCode {
    /// The numeric code carried in an [`ErrorPayload`].
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Message attached to the connectivity short-circuit failure.
pub const CONNECTION_ERROR_MESSAGE: &str = "Please check your internet connection.";

/// A normalized failure surfaced to callers.
///
/// Decoded from a server error body or synthesized locally. `http_status` is
/// stamped by the dispatcher with the observed status code after decoding;
/// the payload is never mutated after delivery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "httpStatus", skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl ErrorPayload {
    /// A locally synthesized payload with the given code and message.
    pub fn local(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.code()),
            title: Some("Warning".to_string()),
            message: Some(message.into()),
            http_status: None,
        }
    }

    pub fn code_or_default(&self) -> i64 {
        self.code.unwrap_or_default()
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    pub fn http_status_or_default(&self) -> u16 {
        self.http_status.unwrap_or_default()
    }
}

/// Contract for the failure channel of a dispatched request.
///
/// The dispatcher must be able to hand locally detected failures (no
/// connectivity, transport errors, undecodable bodies) to the caller through
/// the same channel as decoded server errors, so any failure shape must be
/// constructible from an [`ErrorPayload`]. Shapes that carry an HTTP status
/// field override `stamp_http_status`; for everything else stamping is a
/// no-op.
pub trait FailurePayload: DeserializeOwned {
    /// Build the failure shape from a locally synthesized payload.
    fn from_payload(payload: ErrorPayload) -> Self;

    /// Record the observed HTTP status code on the decoded value.
    fn stamp_http_status(&mut self, _status: u16) {}
}

impl FailurePayload for ErrorPayload {
    fn from_payload(payload: ErrorPayload) -> Self {
        payload
    }

    fn stamp_http_status(&mut self, status: u16) {
        self.http_status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Unknown.code(), 0);
        assert_eq!(ErrorCode::Connection.code(), 1);
        assert_eq!(ErrorCode::InvalidResponse.code(), 5);
        assert_eq!(ErrorCode::Server.code(), 6);
        assert_eq!(ErrorCode::UnsupportedUrl.code(), 9);
    }

    #[test]
    fn test_local_payload() {
        let payload = ErrorPayload::local(ErrorCode::Connection, CONNECTION_ERROR_MESSAGE);
        assert_eq!(payload.code, Some(1));
        assert_eq!(payload.title.as_deref(), Some("Warning"));
        assert_eq!(payload.message.as_deref(), Some(CONNECTION_ERROR_MESSAGE));
        assert_eq!(payload.http_status, None);
    }

    #[test]
    fn test_decode_from_server_body() {
        let payload: ErrorPayload = serde_json::from_str(
            r#"{"code":42,"title":"Oops","message":"broken","httpStatus":418}"#,
        )
        .unwrap();
        assert_eq!(payload.code, Some(42));
        assert_eq!(payload.title.as_deref(), Some("Oops"));
        assert_eq!(payload.http_status, Some(418));
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let payload: ErrorPayload = serde_json::from_str(r#"{"message":"broken"}"#).unwrap();
        assert_eq!(payload.code, None);
        assert_eq!(payload.message.as_deref(), Some("broken"));
    }

    #[test]
    fn test_stamp_http_status_overrides_decoded_value() {
        let mut payload: ErrorPayload =
            serde_json::from_str(r#"{"code":4,"httpStatus":999}"#).unwrap();
        payload.stamp_http_status(404);
        assert_eq!(payload.http_status, Some(404));
    }

    #[test]
    fn test_default_accessors() {
        let payload = ErrorPayload::default();
        assert_eq!(payload.code_or_default(), 0);
        assert_eq!(payload.title_or_default(), "");
        assert_eq!(payload.message_or_default(), "");
        assert_eq!(payload.http_status_or_default(), 0);
    }

    #[test]
    fn test_stamping_is_noop_for_plain_shapes() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Plain {
            reason: String,
        }

        impl FailurePayload for Plain {
            fn from_payload(payload: ErrorPayload) -> Self {
                Self {
                    reason: payload.message_or_default().to_string(),
                }
            }
        }

        let mut plain = Plain::from_payload(ErrorPayload::local(ErrorCode::Server, "down"));
        plain.stamp_http_status(500);
        assert_eq!(plain.reason, "down");
    }
}
