// src/presentation/http/openapi.rs
use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, env};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
    server::Server,
};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::oauth::token,
        crate::presentation::http::controllers::oauth::status,
        crate::presentation::http::controllers::tokens::refresh,
        crate::presentation::http::controllers::tokens::revoke,
        crate::presentation::http::controllers::discovery::authorization_server_metadata,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::oauth::AuthStatusResponse,
            crate::presentation::http::controllers::tokens::RevokeRequest,
            crate::presentation::http::controllers::tokens::RevokeResponse,
            crate::presentation::http::controllers::discovery::AuthorizationServerMetadata,
            crate::application::dto::TokenPairDto,
            crate::application::ports::control_plane::EnvVar
        )
    ),
    tags(
        (name = "OAuth", description = "Authorization, token and revocation endpoints"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    security(("bearerAuth" = [])),
    info(
        title = "Kagi API",
        description = "Authorization server and push channel for the deploy control plane",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        let mut http = Http::new(HttpAuthScheme::Bearer);
        http.bearer_format = Some("JWT".into());
        components.add_security_scheme("bearerAuth", SecurityScheme::Http(http));

        let servers = openapi.servers.get_or_insert_with(Vec::new);
        servers.clear();

        let mut urls: Vec<String> = env::var("PUBLIC_API_URLS")
            .ok()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| segment.trim_end_matches('/').to_string())
                    .collect()
            })
            .unwrap_or_default();

        if urls.is_empty() {
            let url = crate::config::AppConfig::public_base_url_from_env();
            urls.push(url.trim_end_matches('/').to_string());
        }

        let mut seen = HashSet::new();
        for url in urls {
            if seen.insert(url.clone()) {
                servers.push(Server::new(url));
            }
        }
    }
}

pub async fn serve_openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

pub fn docs_router() -> Router {
    let openapi = ApiDoc::openapi();
    let swagger = SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi.clone());
    let redoc = Redoc::with_url("/redoc", openapi);
    Router::new()
        .route("/openapi.json", get(serve_openapi))
        .merge(swagger)
        .merge(redoc)
}
