//! Error types for the deals client.

use thiserror::Error;

use crate::api::ApiError;

/// Failure while persisting the session slot
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to write session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode session: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Refusing to store an empty session token")]
    EmptyToken,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The remote service rejected the call or could not be reached
    #[error(transparent)]
    Api(#[from] ApiError),
    /// An authenticated operation was attempted with no session token.
    /// No request is sent; the caller should send the user to login.
    #[error("Not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Text a view shows for this failure
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(e) => e.message.clone(),
            ClientError::NotAuthenticated => "Please log in to continue".to_string(),
            ClientError::Session(e) => e.to_string(),
        }
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// The caller has to (re)authenticate before retrying
    pub fn requires_login(&self) -> bool {
        match self {
            ClientError::NotAuthenticated => true,
            ClientError::Api(e) => e.is_unauthorized(),
            ClientError::Session(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_passes_through_unchanged() {
        let err =
            ClientError::from(ApiError::from_response(403, json!({ "message": "Not verified" })));
        assert_eq!(err.to_string(), "Not verified");
        assert_eq!(err.user_message(), "Not verified");
        assert_eq!(err.api_error().map(|e| e.status_code), Some(403));
        assert!(!err.requires_login());
    }

    #[test]
    fn test_login_required() {
        assert!(ClientError::NotAuthenticated.requires_login());
        let expired =
            ClientError::from(ApiError::from_response(401, json!({ "message": "Token expired" })));
        assert!(expired.requires_login());
    }
}
