// src/infrastructure/security/token.rs
use crate::application::{
    ApplicationResult,
    dto::AuthenticatedClient,
    error::ApplicationError,
    ports::{ClockPort, security::{IssuedAccessToken, TokenManager}},
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::{sync::Arc, time::Duration};

type HmacSha256 = Hmac<Sha256>;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    client_id: String,
    token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_provider: Option<String>,
    iat: i64,
    exp: i64,
}

/// Self-contained access tokens signed with the configured secret
/// (HMAC-SHA256 over the usual `header.claims` compact form). Nothing is
/// stored server-side; validity is signature plus expiry, so a token cannot
/// be revoked before it expires naturally.
#[derive(Clone)]
pub struct HmacTokenManager {
    secret: Arc<Vec<u8>>,
    ttl: Duration,
    clock: Arc<ClockPort>,
}

impl HmacTokenManager {
    pub fn new(secret: &str, ttl: Duration, clock: Arc<ClockPort>) -> Self {
        Self {
            secret: Arc::new(secret.as_bytes().to_vec()),
            ttl,
            clock,
        }
    }

    fn mac(&self) -> ApplicationResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }

    fn sign(&self, signing_input: &str) -> ApplicationResult<String> {
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }
}

/// One verdict for every verification failure; the caller cannot tell a bad
/// signature from an expired or malformed token.
fn invalid() -> ApplicationError {
    ApplicationError::invalid_token("token is invalid or expired")
}

#[async_trait]
impl TokenManager for HmacTokenManager {
    async fn issue(&self, client_id: &str) -> ApplicationResult<IssuedAccessToken> {
        let now = self.clock.now();
        let expires_in = self.ttl.as_secs() as i64;
        let claims = Claims {
            client_id: client_id.to_string(),
            token_type: "access".into(),
            auth_provider: None,
            iat: now.timestamp(),
            exp: now.timestamp() + expires_in,
        };

        let claims_json = serde_json::to_vec(&claims)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER),
            URL_SAFE_NO_PAD.encode(claims_json)
        );
        let signature = self.sign(&signing_input)?;

        Ok(IssuedAccessToken {
            token: format!("{signing_input}.{signature}"),
            expires_in,
        })
    }

    async fn verify(&self, token: &str) -> ApplicationResult<AuthenticatedClient> {
        let mut parts = token.split('.');
        let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s), None) => (h, p, s),
            _ => return Err(invalid()),
        };

        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| invalid())?;
        let mut mac = self.mac()?;
        mac.update(format!("{header}.{payload}").as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let claims_json = URL_SAFE_NO_PAD.decode(payload).map_err(|_| invalid())?;
        let claims: Claims = serde_json::from_slice(&claims_json).map_err(|_| invalid())?;

        let now = self.clock.now();
        if now.timestamp() >= claims.exp {
            return Err(invalid());
        }

        Ok(AuthenticatedClient {
            client_id: claims.client_id,
            token_type: claims.token_type,
            auth_provider: claims.auth_provider,
            issued_at: timestamp(claims.iat),
            expires_at: timestamp(claims.exp),
        })
    }
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}
