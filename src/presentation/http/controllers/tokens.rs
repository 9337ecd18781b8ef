// src/presentation/http/controllers/tokens.rs
//
// Sibling endpoints of the token exchange: refresh rotation and
// revocation. Same parameter handling as the token endpoint.
use crate::application::commands::oauth::{RefreshTokenCommand, RevokeTokenCommand};
use crate::application::dto::TokenPairDto;
use crate::presentation::http::controllers::oauth::merged_params;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    body::Bytes,
    extract::RawQuery,
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Rotated access/refresh token pair.", body = TokenPairDto),
        (status = 400, description = "Grant validation failure.", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn refresh(
    Extension(state): Extension<HttpState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<TokenPairDto>> {
    let mut params = merged_params(query.as_deref(), &headers, &body);

    let command = RefreshTokenCommand {
        grant_type: params.remove("grant_type"),
        refresh_token: params.remove("refresh_token"),
        client_id: params.remove("client_id"),
    };

    state
        .services
        .oauth_commands
        .refresh(command)
        .await
        .into_http()
        .map(Json)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RevokeRequest {
    pub token: Option<String>,
    pub token_type_hint: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevokeResponse {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/auth/revoke",
    responses(
        (status = 200, description = "Revocation acknowledged; absence of the token is not an error.", body = RevokeResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn revoke(
    Extension(state): Extension<HttpState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<RevokeResponse>> {
    let mut params = merged_params(query.as_deref(), &headers, &body);

    let command = RevokeTokenCommand {
        token: params.remove("token"),
        token_type_hint: params.remove("token_type_hint"),
    };

    state
        .services
        .oauth_commands
        .revoke(command)
        .await
        .into_http()?;

    Ok(Json(RevokeResponse { success: true }))
}
