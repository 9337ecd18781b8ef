// src/presentation/http/extractors.rs
use crate::{
    application::{dto::AuthenticatedClient, error::ApplicationError},
    presentation::http::state::HttpState,
};
use axum::{Extension, extract::FromRequestParts, http::request::Parts};
use headers::{Authorization, Cookie, HeaderMapExt, authorization::Bearer};

use super::error::HttpError;

/// Cookie a browser-based client may carry the access token in.
pub const AUTH_COOKIE: &str = "mcp_auth_token";

/// Extractor for endpoints that require a valid bearer token; rejects with
/// 401 `invalid_token` otherwise.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedClient);

/// Extractor for the streaming endpoint: resolves the authentication state
/// exactly once, from the Authorization header (precedence) or the session
/// cookie, and never rejects. A failed verification degrades to
/// unauthenticated with the error carried along for the event stream.
#[derive(Debug, Clone)]
pub struct StreamAuth {
    pub client: Option<AuthenticatedClient>,
    pub error: Option<String>,
}

fn state_missing() -> HttpError {
    HttpError::from_error(ApplicationError::infrastructure(
        "application state missing",
    ))
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .map(|header| header.token().to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(AUTH_COOKIE).map(str::to_string))
}

impl FromRequestParts<()> for Authenticated {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &()) -> Result<Self, Self::Rejection> {
        let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
            .await
            .map_err(|_| state_missing())?;

        let token = bearer_token(parts).ok_or_else(|| {
            HttpError::from_error(ApplicationError::invalid_token(
                "access token required",
            ))
        })?;

        let client = app_state
            .services
            .authenticate_client(&token)
            .await
            .map_err(HttpError::from_error)?;

        Ok(Self(client))
    }
}

impl FromRequestParts<()> for StreamAuth {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &()) -> Result<Self, Self::Rejection> {
        let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
            .await
            .map_err(|_| state_missing())?;

        // Header wins over cookie; state is decided here once for the whole
        // session lifetime.
        let Some(token) = bearer_token(parts).or_else(|| cookie_token(parts)) else {
            return Ok(Self {
                client: None,
                error: None,
            });
        };

        match app_state.services.authenticate_client(&token).await {
            Ok(client) => Ok(Self {
                client: Some(client),
                error: None,
            }),
            Err(err) => {
                tracing::debug!(error = %err, "stream credential rejected, continuing unauthenticated");
                Ok(Self {
                    client: None,
                    error: Some(err.to_string()),
                })
            }
        }
    }
}
