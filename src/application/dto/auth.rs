// src/application/dto/auth.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful token response for both grant types.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
}

impl TokenPairDto {
    pub fn bearer(access_token: String, expires_in: i64, refresh_token: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer".into(),
            expires_in,
            refresh_token,
        }
    }
}

/// Claims recovered from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    pub client_id: String,
    pub token_type: String,
    pub auth_provider: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
