// tests/support/mocks.rs
//! テストサポートモック（決定論的な時計とダミーのコントロールプレーン）
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use serde_json::{Value as JsonValue, json};
use std::sync::Mutex;

use kagi_core::application::ApplicationResult;
use kagi_core::application::ports::control_plane::{ControlPlane, EnvVar};
use kagi_core::application::ports::time::Clock;

/// テスト用の固定タイムスタンプ
static FIXED_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
        .expect("invalid RFC3339 in tests/support/mocks.rs")
        .with_timezone(&Utc)
});

pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

/* -------------------------------- Clock -------------------------------- */

/// A clock tests can move forward to cross expiry deadlines.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/* ----------------------------- ControlPlane ----------------------------- */

/// Canned control-plane responses; no network involved.
#[derive(Default)]
pub struct StaticControlPlane;

#[async_trait]
impl ControlPlane for StaticControlPlane {
    async fn list_services(&self) -> ApplicationResult<JsonValue> {
        Ok(json!([{ "id": "srv-1", "name": "api" }, { "id": "srv-2", "name": "worker" }]))
    }

    async fn get_service(&self, service_id: &str) -> ApplicationResult<JsonValue> {
        Ok(json!({ "id": service_id, "name": "api" }))
    }

    async fn deploy_service(
        &self,
        service_id: &str,
        clear_cache: bool,
    ) -> ApplicationResult<JsonValue> {
        Ok(json!({ "id": service_id, "deploy": { "clearCache": clear_cache } }))
    }

    async fn update_env_vars(
        &self,
        service_id: &str,
        env_vars: &[EnvVar],
    ) -> ApplicationResult<JsonValue> {
        Ok(json!({ "id": service_id, "updated": env_vars.len() }))
    }

    async fn restart_service(&self, service_id: &str) -> ApplicationResult<JsonValue> {
        Ok(json!({ "id": service_id, "status": "restarting" }))
    }

    async fn suspend_service(&self, service_id: &str) -> ApplicationResult<JsonValue> {
        Ok(json!({ "id": service_id, "status": "suspended" }))
    }

    async fn resume_service(&self, service_id: &str) -> ApplicationResult<JsonValue> {
        Ok(json!({ "id": service_id, "status": "running" }))
    }
}
