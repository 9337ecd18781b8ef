// tests/support/helpers.rs
use super::mocks::{ManualClock, StaticControlPlane, fixed_now};
use axum::body;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use kagi_core::application::ports::{
    AuthorizationCodeStorePort, ClockPort, ControlPlanePort, RefreshTokenStorePort,
    TokenGeneratorPort, TokenManagerPort,
};
use kagi_core::application::services::ApplicationServices;
use kagi_core::domain::policy::ApprovalPolicy;
use kagi_core::infrastructure::{
    security::{
        code_store::InMemoryAuthorizationCodeStore, refresh_store::InMemoryRefreshTokenStore,
        token::HmacTokenManager,
    },
    stream::{SessionHub, StreamSettings},
    util::HexTokenGenerator,
};
use kagi_core::presentation::http::{routes, state::HttpState};

pub const TEST_SECRET: &str = "integration-test-signing-secret!!";
pub const TEST_CLIENT_ID: &str = "render_mcp_client";
pub const TEST_AUTH_URL: &str =
    "http://127.0.0.1:8080/auth/authorize?response_type=code&client_id=render_mcp_client";

pub struct TestApp {
    pub router: axum::Router,
    pub clock: Arc<ManualClock>,
    pub hub: Arc<SessionHub>,
}

pub async fn make_test_app() -> TestApp {
    make_test_app_with_intervals(Duration::from_secs(30), Duration::from_secs(10)).await
}

/// Build the full router against in-memory stores, a manual clock and a
/// canned control plane. Stream cadences are injectable so SSE tests can
/// observe reminders without waiting wall-clock seconds.
pub async fn make_test_app_with_intervals(
    keepalive_interval: Duration,
    auth_reminder_interval: Duration,
) -> TestApp {
    let clock = Arc::new(ManualClock::starting_at(fixed_now()));

    let codes: Arc<AuthorizationCodeStorePort> = Arc::new(InMemoryAuthorizationCodeStore::new());
    let refresh_tokens: Arc<RefreshTokenStorePort> = Arc::new(InMemoryRefreshTokenStore::new());
    let token_generator: Arc<TokenGeneratorPort> = Arc::new(HexTokenGenerator::default());
    let control_plane: Arc<ControlPlanePort> = Arc::new(StaticControlPlane);

    let token_manager: Arc<TokenManagerPort> = Arc::new(HmacTokenManager::new(
        TEST_SECRET,
        Duration::from_secs(3600),
        Arc::clone(&clock) as Arc<ClockPort>,
    ));

    let policy = ApprovalPolicy::new(
        TEST_CLIENT_ID,
        vec!["claude.ai".into(), "localhost".into()],
    );

    let services = Arc::new(ApplicationServices::new(
        codes,
        refresh_tokens,
        token_manager,
        token_generator,
        control_plane,
        Arc::clone(&clock) as Arc<ClockPort>,
        policy,
        Duration::from_secs(600),
        Duration::from_secs(60 * 60 * 24 * 30),
    ));

    let hub = Arc::new(SessionHub::new(
        StreamSettings {
            keepalive_interval,
            auth_reminder_interval,
            auth_url: TEST_AUTH_URL.into(),
        },
        Arc::clone(&clock) as Arc<ClockPort>,
    ));

    let state = HttpState {
        services,
        hub: Arc::clone(&hub),
    };

    TestApp {
        router: routes::build_router_with_rate_limiter(state, false),
        clock,
        hub,
    }
}

pub async fn response_json(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let json: Value = serde_json::from_slice(&bytes).expect("expected valid json body");
    (status, json)
}

/// Assert that a response is the `{error, error_description}` shape with the
/// expected status and taxonomy member.
pub async fn assert_error_response(
    resp: Response,
    expected_status: StatusCode,
    expected_error: &str,
) {
    let (status, json) = response_json(resp).await;
    assert_eq!(status, expected_status);
    let error = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    let description = json
        .get("error_description")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    assert_eq!(error, expected_error, "unexpected error field: {error}");
    assert!(
        !description.is_empty(),
        "expected non-empty error_description"
    );
}
