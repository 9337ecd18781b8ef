// src/infrastructure/control_plane.rs
use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::control_plane::{ControlPlane, EnvVar},
};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{Value as JsonValue, json};

/// HTTP client for the remote control-plane API. The core treats every
/// response and failure as opaque upstream data; nothing here interprets
/// the payloads.
pub struct HttpControlPlane {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpControlPlane {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token,
        }
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
    ) -> ApplicationResult<JsonValue> {
        let token = self.api_token.as_deref().ok_or_else(|| {
            ApplicationError::upstream("control-plane API token is not configured")
        })?;

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut request = self.client.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ApplicationError::upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApplicationError::upstream(format!(
                "control-plane API error: {status} {detail}"
            )));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(json!({}));
        }

        response
            .json::<JsonValue>()
            .await
            .map_err(|err| ApplicationError::upstream(err.to_string()))
    }
}

#[async_trait]
impl ControlPlane for HttpControlPlane {
    async fn list_services(&self) -> ApplicationResult<JsonValue> {
        self.call(Method::GET, "/services", None).await
    }

    async fn get_service(&self, service_id: &str) -> ApplicationResult<JsonValue> {
        self.call(Method::GET, &format!("/services/{service_id}"), None)
            .await
    }

    async fn deploy_service(
        &self,
        service_id: &str,
        clear_cache: bool,
    ) -> ApplicationResult<JsonValue> {
        self.call(
            Method::POST,
            &format!("/services/{service_id}/deploys"),
            Some(json!({ "clearCache": clear_cache })),
        )
        .await
    }

    async fn update_env_vars(
        &self,
        service_id: &str,
        env_vars: &[EnvVar],
    ) -> ApplicationResult<JsonValue> {
        self.call(
            Method::PUT,
            &format!("/services/{service_id}/env-vars"),
            Some(json!({ "envVars": env_vars })),
        )
        .await
    }

    async fn restart_service(&self, service_id: &str) -> ApplicationResult<JsonValue> {
        self.call(
            Method::POST,
            &format!("/services/{service_id}/restart"),
            None,
        )
        .await
    }

    async fn suspend_service(&self, service_id: &str) -> ApplicationResult<JsonValue> {
        self.call(
            Method::POST,
            &format!("/services/{service_id}/suspend"),
            None,
        )
        .await
    }

    async fn resume_service(&self, service_id: &str) -> ApplicationResult<JsonValue> {
        self.call(
            Method::POST,
            &format!("/services/{service_id}/resume"),
            None,
        )
        .await
    }
}
