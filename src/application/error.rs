// src/application/error.rs
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Application-level failures. The first five variants are the OAuth error
/// taxonomy surfaced on the wire as `{error, error_description}`; the last
/// two cover the external collaborator and unexpected internal faults.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    #[error("invalid_grant: {0}")]
    InvalidGrant(String),

    #[error("invalid_client: {0}")]
    InvalidClient(String),

    #[error("unsupported_grant_type: {0}")]
    UnsupportedGrantType(String),

    #[error("invalid_token: {0}")]
    InvalidToken(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_grant(msg: impl Into<String>) -> Self {
        Self::InvalidGrant(msg.into())
    }

    pub fn invalid_client(msg: impl Into<String>) -> Self {
        Self::InvalidClient(msg.into())
    }

    pub fn unsupported_grant_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedGrantType(msg.into())
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// Wire error code for the `{error, error_description}` response shape.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::InvalidClient(_) => "invalid_client",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::InvalidToken(_) => "invalid_token",
            Self::Upstream(_) => "upstream_error",
            Self::Infrastructure(_) => "server_error",
        }
    }
}
