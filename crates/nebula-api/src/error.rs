//! API error types and HTTP status mapping.

use std::collections::HashMap;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by the Nebula API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid local configuration (token, server URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required request parameter was not supplied or is invalid.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A lookup by name or alias found no match.
    #[error("{0} not found")]
    NotFound(String),

    /// The server answered with a non-2xx status.
    #[error("remote error ({status}): {message}")]
    Remote {
        /// HTTP status code returned by the server.
        status: u16,
        /// Mapped or generic message for the status.
        message: String,
    },

    /// A compact string (commit location, remote spec) failed to parse.
    #[error("parse error: {0}")]
    Parse(String),

    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Map an HTTP status to a domain error.
///
/// 2xx maps to `Ok(())`. 404 and 402 carry fixed messages; `overrides`
/// supplies per-call mappings (namespace create passes 409 → "Already
/// exists"). Any other status surfaces as a generic remote error with the
/// raw code.
pub fn check_status(status: StatusCode, overrides: &HashMap<u16, &str>) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }

    let code = status.as_u16();
    let message = if let Some(msg) = overrides.get(&code) {
        (*msg).to_string()
    } else {
        match code {
            404 => "Not found".to_string(),
            402 => "Not authorized".to_string(),
            _ => format!("api request failed with status code {code}"),
        }
    };

    Err(ApiError::Remote {
        status: code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> HashMap<u16, &'static str> {
        HashMap::new()
    }

    #[test]
    fn success_statuses_pass() {
        assert!(check_status(StatusCode::OK, &no_overrides()).is_ok());
        assert!(check_status(StatusCode::CREATED, &no_overrides()).is_ok());
        assert!(check_status(StatusCode::NO_CONTENT, &no_overrides()).is_ok());
    }

    #[test]
    fn not_found_maps_to_fixed_message() {
        let err = check_status(StatusCode::NOT_FOUND, &no_overrides()).unwrap_err();
        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn payment_required_maps_to_not_authorized() {
        let err = check_status(StatusCode::PAYMENT_REQUIRED, &no_overrides()).unwrap_err();
        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 402);
                assert_eq!(message, "Not authorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn override_takes_precedence() {
        let overrides = HashMap::from([(409u16, "Already exists")]);
        let err = check_status(StatusCode::CONFLICT, &overrides).unwrap_err();
        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Already exists");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn conflict_without_override_is_generic() {
        let err = check_status(StatusCode::CONFLICT, &no_overrides()).unwrap_err();
        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 409);
                assert!(message.contains("409"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn server_error_carries_code() {
        let err = check_status(StatusCode::INTERNAL_SERVER_ERROR, &no_overrides()).unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
