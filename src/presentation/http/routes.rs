// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{discovery, oauth, services, stream, tokens},
    middleware::rate_limit::rate_limit_layer,
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Json, Router,
    http::Method,
    routing::{get, post, put},
};
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: HttpState) -> Router {
    build_router_with_rate_limiter(state, true)
}

pub fn build_router_with_rate_limiter(state: HttpState, rate_limited: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600));

    let mut router = Router::new()
        .merge(openapi::docs_router())
        .route("/", get(index))
        .route("/health", get(health))
        .route("/auth", get(oauth::authorize_entry))
        .route("/auth/authorize", get(oauth::authorize))
        .route("/auth/token", post(oauth::token))
        .route("/auth/refresh", post(tokens::refresh))
        .route("/auth/revoke", post(tokens::revoke))
        .route("/auth/status", get(oauth::status))
        .route(
            "/.well-known/oauth-authorization-server",
            get(discovery::authorization_server_metadata),
        )
        .route("/events", get(stream::events))
        .route("/events/request", post(stream::dispatch))
        .route("/api/services", get(services::list_services))
        .route("/api/services/{id}", get(services::get_service))
        .route("/api/services/{id}/deploy", post(services::deploy_service))
        .route("/api/services/{id}/env-vars", put(services::update_env_vars))
        .route("/api/services/{id}/restart", post(services::restart_service))
        .route("/api/services/{id}/suspend", post(services::suspend_service))
        .route("/api/services/{id}/resume", post(services::resume_service));

    if rate_limited {
        router = router.layer(rate_limit_layer());
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

pub async fn index(Extension(state): Extension<HttpState>) -> Json<JsonValue> {
    Json(json!({
        "message": "authorization server is running",
        "status": "OK",
        "timestamp": state.services.clock().now().to_rfc3339(),
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    tag = "System"
)]
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
    })
}
