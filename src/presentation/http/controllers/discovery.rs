// src/presentation/http/controllers/discovery.rs
use crate::presentation::http::error::HttpResult;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorizationServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub revocation_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/.well-known/oauth-authorization-server",
    responses(
        (status = 200, description = "OAuth authorization server metadata.", body = AuthorizationServerMetadata),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn authorization_server_metadata(
    Extension(_state): Extension<HttpState>,
) -> HttpResult<Json<AuthorizationServerMetadata>> {
    let issuer = crate::config::AppConfig::public_base_url_from_env();
    let base = issuer.trim_end_matches('/').to_string();

    let metadata = AuthorizationServerMetadata {
        issuer: base.clone(),
        authorization_endpoint: format!("{base}/auth/authorize"),
        token_endpoint: format!("{base}/auth/token"),
        revocation_endpoint: format!("{base}/auth/revoke"),
        response_types_supported: vec!["code".into()],
        grant_types_supported: vec!["authorization_code".into(), "refresh_token".into()],
        code_challenge_methods_supported: vec!["S256".into()],
        token_endpoint_auth_methods_supported: vec!["none".into()],
    };

    Ok(Json(metadata))
}
