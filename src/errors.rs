//! Error types for the Fitbit client.
//!
//! Every API operation reports exactly one [`FitbitError`] on failure. Transport
//! errors from `reqwest` are carried through untouched so callers can inspect
//! status codes themselves.

use thiserror::Error;

/// Result type for Fitbit client operations.
pub type FitbitResult<T> = Result<T, FitbitError>;

#[derive(Debug, Error)]
pub enum FitbitError {
    /// The request succeeded but the response carried no body.
    #[error("No data in response")]
    NoData,

    /// The response body was not a JSON object.
    #[error("Unable to parse response as a JSON object")]
    UnableToParse,

    /// No authenticated session is available.
    #[error("Not logged in. Run fitbitcli auth.")]
    NotLoggedIn,

    /// The request URL could not be constructed, e.g. no user id is stored.
    #[error("Invalid request URL")]
    InvalidUrl,

    /// Network failure or non-success status, as reported by the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The redirect URL fragment lacked `access_token` or `user_id`.
    #[error("Redirect URL is missing access_token or user_id")]
    IncompleteRedirect,

    /// The redirect URL does not start with the configured callback URL.
    #[error("Redirect URL does not match the registered callback URL")]
    UnexpectedRedirect,

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The access token cannot be used as an HTTP header value.
    #[error("Session error: {0}")]
    Session(String),
}

impl FitbitError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True when the caller has to authorize again before retrying.
    pub fn needs_login(&self) -> bool {
        match self {
            FitbitError::NotLoggedIn => true,
            FitbitError::Transport(e) => e.status() == Some(reqwest::StatusCode::UNAUTHORIZED),
            _ => false,
        }
    }
}
