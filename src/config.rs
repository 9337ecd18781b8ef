// src/config.rs
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    token_signing_secret: String,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    auth_code_ttl: Duration,
    client_id: String,
    trusted_redirects: Vec<String>,
    allowed_origins: Vec<String>,
    keepalive_interval: Duration,
    auth_reminder_interval: Duration,
    sweep_interval: Duration,
    control_plane_url: String,
    control_plane_token: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_client_id() -> String {
    "render_mcp_client".into()
}

fn default_trusted_redirects() -> Vec<String> {
    vec!["claude.ai".into(), "localhost".into()]
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".into()]
}

fn default_access_token_ttl() -> u64 {
    3600
}

fn default_refresh_token_ttl() -> u64 {
    60 * 60 * 24 * 30
}

fn default_auth_code_ttl() -> u64 {
    600
}

fn env_secs(key: &str, default: u64) -> Duration {
    let secs = env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

fn env_csv(key: &str) -> Option<Vec<String>> {
    env::var(key)
        .ok()
        .map(|s| s.split(',').map(|p| p.trim().to_string()).collect())
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| default_listen_addr());
        let token_signing_secret = env::var("TOKEN_SIGNING_SECRET")
            .map_err(|_| ConfigError::Missing("TOKEN_SIGNING_SECRET"))?;

        if token_signing_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "TOKEN_SIGNING_SECRET must be at least 32 bytes".into(),
            ));
        }

        let client_id = env::var("OAUTH_CLIENT_ID").unwrap_or_else(|_| default_client_id());

        // Extra trusted redirect markers extend the built-in allow-list.
        let mut trusted_redirects = default_trusted_redirects();
        if let Some(extra) = env_csv("ALLOWED_REDIRECT_URIS") {
            trusted_redirects.extend(extra.into_iter().filter(|s| !s.is_empty()));
        }

        let allowed_origins = env_csv("ALLOWED_ORIGINS").unwrap_or_else(default_allowed_origins);

        let control_plane_url = env::var("CONTROL_PLANE_API_URL")
            .unwrap_or_else(|_| "https://api.render.com/v1".into());
        let control_plane_token = env::var("CONTROL_PLANE_API_TOKEN").ok();

        Ok(Self {
            listen_addr,
            token_signing_secret,
            access_token_ttl: env_secs("ACCESS_TOKEN_TTL_SECONDS", default_access_token_ttl()),
            refresh_token_ttl: env_secs("REFRESH_TOKEN_TTL_SECONDS", default_refresh_token_ttl()),
            auth_code_ttl: env_secs("AUTH_CODE_TTL_SECONDS", default_auth_code_ttl()),
            client_id,
            trusted_redirects,
            allowed_origins,
            keepalive_interval: env_secs("KEEPALIVE_INTERVAL_SECONDS", 30),
            auth_reminder_interval: env_secs("AUTH_REMINDER_INTERVAL_SECONDS", 10),
            sweep_interval: env_secs("SWEEP_INTERVAL_SECONDS", 60),
            control_plane_url,
            control_plane_token,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn token_signing_secret(&self) -> &str {
        &self.token_signing_secret
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    pub fn auth_code_ttl(&self) -> Duration {
        self.auth_code_ttl
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Redirect-URI markers that auto-approve an authorization request.
    pub fn trusted_redirects(&self) -> &[String] {
        &self.trusted_redirects
    }

    /// Return the allowed CORS origins as configured (cached on AppConfig).
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    pub fn keepalive_interval(&self) -> Duration {
        self.keepalive_interval
    }

    pub fn auth_reminder_interval(&self) -> Duration {
        self.auth_reminder_interval
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    pub fn control_plane_url(&self) -> &str {
        &self.control_plane_url
    }

    pub fn control_plane_token(&self) -> Option<&str> {
        self.control_plane_token.as_deref()
    }

    /// Determine the public base URL used for the auth-challenge URL and
    /// discovery documents. Prefer explicit env var `PUBLIC_BASE_URL` if
    /// present; otherwise derive a sensible default from the listen address.
    pub fn public_base_url_from_env() -> String {
        std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}", default_listen_addr()))
    }
}
