use crate::application::{ApplicationResult, error::ApplicationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    error: &'static str,
    description: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        let error = err.error_code();
        match err {
            ApplicationError::InvalidRequest(msg)
            | ApplicationError::InvalidGrant(msg)
            | ApplicationError::InvalidClient(msg)
            | ApplicationError::UnsupportedGrantType(msg) => {
                Self::new(StatusCode::BAD_REQUEST, error, msg)
            }
            ApplicationError::InvalidToken(msg) => Self::new(StatusCode::UNAUTHORIZED, error, msg),
            ApplicationError::Upstream(msg) => Self::new(StatusCode::BAD_GATEWAY, error, msg),
            ApplicationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "internal fault");
                // Detail stays in the log; the wire only carries it in
                // development builds.
                let description = if cfg!(debug_assertions) {
                    msg
                } else {
                    "an unexpected error occurred".to_string()
                };
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, description)
            }
        }
    }

    fn new(status: StatusCode, error: &'static str, description: String) -> Self {
        Self {
            status,
            error,
            description,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.error.to_string(),
            error_description: self.description,
        };
        (self.status, Json(payload)).into_response()
    }
}

/// The `{error, error_description}` wire shape every failure uses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
