// src/application/ports/security.rs
use crate::application::{ApplicationResult, dto::AuthenticatedClient};
use async_trait::async_trait;

/// A freshly minted access token together with its advertised lifetime.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub expires_in: i64,
}

#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Mint a signed access token for the given client.
    async fn issue(&self, client_id: &str) -> ApplicationResult<IssuedAccessToken>;
    /// Verify signature and expiry. All failure modes (malformed, bad
    /// signature, expired) collapse into one `invalid_token` verdict so the
    /// response cannot be used as an oracle.
    async fn verify(&self, token: &str) -> ApplicationResult<AuthenticatedClient>;
}
