//! Access-token and API-server resolution from the environment.

use crate::constants::{DEFAULT_API_SERVER, ENV_ACCESS_TOKEN, ENV_API_SERVER};
use crate::error::ApiError;

/// Resolved credentials for the Nebula API.
///
/// The token is required; the server URL falls back to the production
/// endpoint when `NEBULA_API_SERVER` is unset or empty.
#[derive(Debug, Clone)]
pub struct Credentials {
    access_token: String,
    api_server: String,
}

impl Credentials {
    /// Build credentials from explicit values (used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the token is empty.
    pub fn new(access_token: impl Into<String>, api_server: impl Into<String>) -> Result<Self, ApiError> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(ApiError::Config(format!(
                "access token is empty, set the {ENV_ACCESS_TOKEN} environment variable"
            )));
        }
        let mut api_server = api_server.into();
        if api_server.is_empty() {
            api_server = DEFAULT_API_SERVER.to_string();
        }
        Ok(Self {
            access_token,
            api_server,
        })
    }

    /// Resolve credentials from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `NEBULA_ACCESS_TOKEN` is unset,
    /// before any network call is attempted.
    pub fn from_env() -> Result<Self, ApiError> {
        let token = std::env::var(ENV_ACCESS_TOKEN).unwrap_or_default();
        let server = std::env::var(ENV_API_SERVER).unwrap_or_default();
        Self::new(token, server)
    }

    /// The bearer token attached to every request.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Base URL of the API server, without a trailing slash.
    #[must_use]
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Value of the `Authorization` header for this token.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("token {}", self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_config_error() {
        let err = Credentials::new("", "").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(err.to_string().contains(ENV_ACCESS_TOKEN));
    }

    #[test]
    fn empty_server_falls_back_to_default() {
        let creds = Credentials::new("tok-123", "").expect("valid");
        assert_eq!(creds.api_server(), DEFAULT_API_SERVER);
        assert_eq!(creds.access_token(), "tok-123");
    }

    #[test]
    fn explicit_server_is_kept() {
        let creds = Credentials::new("tok-123", "https://staging.nebula.cloud/api").expect("valid");
        assert_eq!(creds.api_server(), "https://staging.nebula.cloud/api");
    }

    #[test]
    fn authorization_header_format() {
        let creds = Credentials::new("tok-123", "").expect("valid");
        assert_eq!(creds.authorization_header(), "token tok-123");
    }
}
