use anyhow::Result;
use kagi_core::application::ports::{
    AuthorizationCodeStorePort, ClockPort, ControlPlanePort, RefreshTokenStorePort,
    TokenGeneratorPort, TokenManagerPort,
};
use kagi_core::application::services::ApplicationServices;
use kagi_core::config::AppConfig;
use kagi_core::domain::policy::ApprovalPolicy;
use kagi_core::infrastructure::{
    control_plane::HttpControlPlane,
    security::{
        code_store::InMemoryAuthorizationCodeStore, refresh_store::InMemoryRefreshTokenStore,
        token::HmacTokenManager,
    },
    stream::{SessionHub, StreamSettings},
    time::SystemClock,
    util::HexTokenGenerator,
};
use kagi_core::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let codes: Arc<AuthorizationCodeStorePort> = Arc::new(InMemoryAuthorizationCodeStore::new());
    let refresh_tokens: Arc<RefreshTokenStorePort> = Arc::new(InMemoryRefreshTokenStore::new());
    let clock: Arc<ClockPort> = Arc::new(SystemClock::default());
    let token_generator: Arc<TokenGeneratorPort> = Arc::new(HexTokenGenerator::default());

    let token_manager: Arc<TokenManagerPort> = Arc::new(HmacTokenManager::new(
        config.token_signing_secret(),
        config.access_token_ttl(),
        Arc::clone(&clock),
    ));

    let control_plane: Arc<ControlPlanePort> = Arc::new(HttpControlPlane::new(
        config.control_plane_url(),
        config.control_plane_token().map(str::to_string),
    ));

    let policy = ApprovalPolicy::new(config.client_id(), config.trusted_redirects().to_vec());

    let services = Arc::new(ApplicationServices::new(
        Arc::clone(&codes),
        Arc::clone(&refresh_tokens),
        Arc::clone(&token_manager),
        Arc::clone(&token_generator),
        Arc::clone(&control_plane),
        Arc::clone(&clock),
        policy,
        config.auth_code_ttl(),
        config.refresh_token_ttl(),
    ));

    let base_url = AppConfig::public_base_url_from_env();
    let auth_url = format!(
        "{}/auth/authorize?response_type=code&client_id={}",
        base_url.trim_end_matches('/'),
        config.client_id(),
    );
    let hub = Arc::new(SessionHub::new(
        StreamSettings {
            keepalive_interval: config.keepalive_interval(),
            auth_reminder_interval: config.auth_reminder_interval(),
            auth_url,
        },
        Arc::clone(&clock),
    ));

    spawn_credential_sweeper(
        Arc::clone(&codes),
        Arc::clone(&refresh_tokens),
        Arc::clone(&clock),
        config.sweep_interval(),
    );

    let state = HttpState {
        services: Arc::clone(&services),
        hub: Arc::clone(&hub),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    // Connect info feeds the rate limiter's per-peer key extraction.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Periodic TTL sweep over both credential stores. Consumption already
/// rejects expired entries; the sweep only reclaims memory for codes and
/// records nobody ever redeems.
fn spawn_credential_sweeper(
    codes: Arc<AuthorizationCodeStorePort>,
    refresh_tokens: Arc<RefreshTokenStorePort>,
    clock: Arc<ClockPort>,
    interval: std::time::Duration,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let now = clock.now();
            match (
                codes.sweep_expired(now).await,
                refresh_tokens.sweep_expired(now).await,
            ) {
                (Ok(swept_codes), Ok(swept_tokens)) => {
                    if swept_codes + swept_tokens > 0 {
                        tracing::debug!(swept_codes, swept_tokens, "swept expired credentials");
                    }
                }
                (Err(err), _) | (_, Err(err)) => {
                    tracing::warn!(error = %err, "credential sweep failed");
                }
            }
        }
    });
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
