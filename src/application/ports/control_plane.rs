// src/application/ports/control_plane.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// One environment variable entry as the control plane expects it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

/// External collaborator managing the deployable resources. The core only
/// passes requests through; responses and failures are opaque upstream
/// payloads.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn list_services(&self) -> ApplicationResult<JsonValue>;
    async fn get_service(&self, service_id: &str) -> ApplicationResult<JsonValue>;
    async fn deploy_service(
        &self,
        service_id: &str,
        clear_cache: bool,
    ) -> ApplicationResult<JsonValue>;
    async fn update_env_vars(
        &self,
        service_id: &str,
        env_vars: &[EnvVar],
    ) -> ApplicationResult<JsonValue>;
    async fn restart_service(&self, service_id: &str) -> ApplicationResult<JsonValue>;
    async fn suspend_service(&self, service_id: &str) -> ApplicationResult<JsonValue>;
    async fn resume_service(&self, service_id: &str) -> ApplicationResult<JsonValue>;
}
