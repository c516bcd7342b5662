//! API Error
//!
//! Every non-success outcome of a request against the remote service,
//! whether the server answered with an error body or nothing usable came back.

use serde_json::Value;
use thiserror::Error;

use crate::models::VerificationStatus;

/// Fallback when an error body carries no usable `message`
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// Message for failures with no interpretable response
pub const TRANSPORT_ERROR_MESSAGE: &str = "Unable to reach the server";

/// Message for success responses whose body does not match the expected shape
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server";

/// Where a failure originated. Callers should not need to branch on this for
/// control flow; it exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No interpretable response: connection failure or a body that is not JSON
    Transport,
    /// The server answered with a decoded JSON body
    Response,
    /// The request could not be built, so nothing was sent
    Request,
}

/// Normalized failure of a single request
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, or 0 when no response was received
    pub status_code: u16,
    /// Decoded error body; absent for transport failures
    pub payload: Option<Value>,
    pub kind: ApiErrorKind,
}

impl ApiError {
    /// Build an error from a decoded non-2xx body. An empty body decodes as
    /// `Value::Null` and leaves the payload absent.
    pub fn from_response(status_code: u16, payload: Value) -> Self {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();

        Self {
            message,
            status_code,
            payload: (!payload.is_null()).then_some(payload),
            kind: ApiErrorKind::Response,
        }
    }

    /// Build an error for a request that produced nothing decodable
    pub fn transport(status_code: Option<u16>) -> Self {
        Self {
            message: TRANSPORT_ERROR_MESSAGE.to_string(),
            status_code: status_code.unwrap_or(0),
            payload: None,
            kind: ApiErrorKind::Transport,
        }
    }

    /// A request refused before sending, such as an id that is not a
    /// single path segment
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: 0,
            payload: None,
            kind: ApiErrorKind::Request,
        }
    }

    /// A 2xx body that could not be read as the caller's expected type
    pub fn unexpected_shape(status_code: u16, payload: Value) -> Self {
        Self {
            message: UNEXPECTED_RESPONSE_MESSAGE.to_string(),
            status_code,
            payload: Some(payload),
            kind: ApiErrorKind::Response,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind == ApiErrorKind::Transport
    }

    /// The server rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }

    pub fn is_forbidden(&self) -> bool {
        self.status_code == 403
    }

    /// Verification hint attached to gated-claim rejections, if present
    pub fn verification_status(&self) -> Option<VerificationStatus> {
        let raw = self.payload.as_ref()?.get("verificationStatus")?.clone();
        serde_json::from_value(raw).ok()
    }
}
