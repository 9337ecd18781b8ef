// src/presentation/http/controllers/services.rs
//
// Thin pass-through to the control-plane collaborator. Every route requires
// a valid bearer token; payloads and upstream failures are forwarded
// opaquely.
use crate::application::ports::control_plane::EnvVar;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

pub async fn list_services(
    Extension(state): Extension<HttpState>,
    Authenticated(_client): Authenticated,
) -> HttpResult<Json<JsonValue>> {
    state
        .services
        .control_plane()
        .list_services()
        .await
        .into_http()
        .map(Json)
}

pub async fn get_service(
    Extension(state): Extension<HttpState>,
    Authenticated(_client): Authenticated,
    Path(service_id): Path<String>,
) -> HttpResult<Json<JsonValue>> {
    state
        .services
        .control_plane()
        .get_service(&service_id)
        .await
        .into_http()
        .map(Json)
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeployRequest {
    #[serde(rename = "clearCache", default)]
    pub clear_cache: bool,
}

pub async fn deploy_service(
    Extension(state): Extension<HttpState>,
    Authenticated(_client): Authenticated,
    Path(service_id): Path<String>,
    payload: Option<Json<DeployRequest>>,
) -> HttpResult<Json<JsonValue>> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    state
        .services
        .control_plane()
        .deploy_service(&service_id, request.clear_cache)
        .await
        .into_http()
        .map(Json)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEnvVarsRequest {
    #[serde(rename = "envVars")]
    pub env_vars: Vec<EnvVar>,
}

pub async fn update_env_vars(
    Extension(state): Extension<HttpState>,
    Authenticated(_client): Authenticated,
    Path(service_id): Path<String>,
    Json(request): Json<UpdateEnvVarsRequest>,
) -> HttpResult<Json<JsonValue>> {
    state
        .services
        .control_plane()
        .update_env_vars(&service_id, &request.env_vars)
        .await
        .into_http()
        .map(Json)
}

pub async fn restart_service(
    Extension(state): Extension<HttpState>,
    Authenticated(_client): Authenticated,
    Path(service_id): Path<String>,
) -> HttpResult<Json<JsonValue>> {
    state
        .services
        .control_plane()
        .restart_service(&service_id)
        .await
        .into_http()
        .map(Json)
}

pub async fn suspend_service(
    Extension(state): Extension<HttpState>,
    Authenticated(_client): Authenticated,
    Path(service_id): Path<String>,
) -> HttpResult<Json<JsonValue>> {
    state
        .services
        .control_plane()
        .suspend_service(&service_id)
        .await
        .into_http()
        .map(Json)
}

pub async fn resume_service(
    Extension(state): Extension<HttpState>,
    Authenticated(_client): Authenticated,
    Path(service_id): Path<String>,
) -> HttpResult<Json<JsonValue>> {
    state
        .services
        .control_plane()
        .resume_service(&service_id)
        .await
        .into_http()
        .map(Json)
}
