// src/presentation/http/controllers/oauth.rs
use crate::application::commands::oauth::{
    AuthorizeCommand, AuthorizeOutcome, ConsentPrompt, ExchangeCodeCommand, RefreshTokenCommand,
};
use crate::application::dto::TokenPairDto;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Query, RawQuery},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

pub const PROTOCOL_VERSION: &str = "2025-03-26";

#[derive(Debug, Deserialize)]
pub struct AuthorizeParams {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub auto_approve: Option<String>,
}

/// Compatibility shim: the root auth path forwards to the authorize
/// endpoint with the query string intact.
pub async fn authorize_entry(RawQuery(query): RawQuery) -> Redirect {
    let target = match query {
        Some(query) => format!("/auth/authorize?{query}"),
        None => "/auth/authorize".to_string(),
    };
    Redirect::temporary(&target)
}

pub async fn authorize(
    Extension(state): Extension<HttpState>,
    Query(params): Query<AuthorizeParams>,
) -> HttpResult<Response> {
    let command = AuthorizeCommand {
        response_type: params.response_type,
        client_id: params.client_id,
        redirect_uri: params.redirect_uri,
        state: params.state,
        code_challenge: params.code_challenge,
        code_challenge_method: params.code_challenge_method,
        auto_approve: matches!(params.auto_approve.as_deref(), Some("true") | Some("1")),
    };

    let outcome = state
        .services
        .oauth_commands
        .authorize(command)
        .await
        .into_http()?;

    Ok(match outcome {
        AuthorizeOutcome::Redirect(location) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        AuthorizeOutcome::ConsentRequired(prompt) => Html(consent_form(&prompt)).into_response(),
    })
}

#[utoipa::path(
    post,
    path = "/auth/token",
    responses(
        (status = 200, description = "Access/refresh token pair.", body = TokenPairDto),
        (status = 400, description = "Grant validation failure.", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<TokenPairDto>> {
    let mut params = merged_params(query.as_deref(), &headers, &body);

    // The endpoint serves both grant types; the dedicated refresh endpoint
    // remains for callers wired against it.
    if params.get("grant_type").map(String::as_str) == Some("refresh_token") {
        let command = RefreshTokenCommand {
            grant_type: params.remove("grant_type"),
            refresh_token: params.remove("refresh_token"),
            client_id: params.remove("client_id"),
        };

        return state
            .services
            .oauth_commands
            .refresh(command)
            .await
            .into_http()
            .map(Json);
    }

    let command = ExchangeCodeCommand {
        grant_type: params.remove("grant_type"),
        code: params.remove("code"),
        redirect_uri: params.remove("redirect_uri"),
        client_id: params.remove("client_id"),
        code_verifier: params.remove("code_verifier"),
    };

    state
        .services
        .oauth_commands
        .exchange_code(command)
        .await
        .into_http()
        .map(Json)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthStatusResponse {
    pub auth: String,
    pub status: String,
    pub oauth: String,
    pub protocol_version: String,
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/auth/status",
    responses(
        (status = 200, description = "Authorization subsystem status.", body = AuthStatusResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn status(Extension(state): Extension<HttpState>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        auth: "enabled".into(),
        status: "operational".into(),
        oauth: "enabled".into(),
        protocol_version: PROTOCOL_VERSION.into(),
        timestamp: state.services.clock().now().to_rfc3339(),
    })
}

/// Accept parameters from the query string and the body uniformly; body
/// values win when both carry the same key. Form-encoded and JSON bodies
/// are both understood.
pub(super) fn merged_params(
    query: Option<&str>,
    headers: &HeaderMap,
    body: &Bytes,
) -> HashMap<String, String> {
    let mut params: HashMap<String, String> = query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();

    if body.is_empty() {
        return params;
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"));

    if is_json {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice(body) {
            for (key, value) in map {
                match value {
                    serde_json::Value::String(s) => {
                        params.insert(key, s);
                    }
                    serde_json::Value::Number(n) => {
                        params.insert(key, n.to_string());
                    }
                    serde_json::Value::Bool(b) => {
                        params.insert(key, b.to_string());
                    }
                    _ => {}
                }
            }
        }
    } else if let Ok(form) = serde_urlencoded::from_bytes::<HashMap<String, String>>(body) {
        params.extend(form);
    }

    params
}

fn consent_form(prompt: &ConsentPrompt) -> String {
    let client_id = prompt.client_id.as_deref().unwrap_or("manual-client");
    let mut hidden_fields = format!(
        r#"<input type="hidden" name="response_type" value="code">
              <input type="hidden" name="client_id" value="{}">
              <input type="hidden" name="redirect_uri" value="{}">"#,
        escape_html(client_id),
        escape_html(&prompt.redirect_uri),
    );

    for (name, value) in [
        ("state", prompt.state.as_deref()),
        ("code_challenge", prompt.code_challenge.as_deref()),
        (
            "code_challenge_method",
            prompt.code_challenge_method.as_deref(),
        ),
    ] {
        if let Some(value) = value {
            hidden_fields.push_str(&format!(
                "\n              <input type=\"hidden\" name=\"{name}\" value=\"{}\">",
                escape_html(value)
            ));
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Connection approval</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 0; padding: 20px; }}
    .container {{ max-width: 600px; margin: 0 auto; }}
    .btn {{ display: inline-block; padding: 10px 15px; background: #0066cc; color: white; border: none; cursor: pointer; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>Approve this connection?</h1>
    <p>The following application is requesting access.</p>
    <p>Client ID: {}</p>
    <p>Redirect URI: {}</p>

    <form action="/auth/authorize" method="get">
              {hidden_fields}
              <input type="hidden" name="auto_approve" value="true">

              <button type="submit" class="btn">Allow access</button>
    </form>
  </div>
</body>
</html>
"#,
        escape_html(client_id),
        escape_html(&prompt.redirect_uri),
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
