// src/domain/credentials.rs
use chrono::{DateTime, Utc};

/// A single-use authorization code bound to the client, redirect target and
/// PKCE parameters it was issued for. The bindings are immutable once the
/// code is created; redemption consumes the record whatever the outcome.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    pub code: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthorizationCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// An opaque refresh token record. Single-use: rotation deletes the old
/// record before the replacement is issued.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub client_id: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code_expiring_at(expires_at: DateTime<Utc>) -> AuthorizationCode {
        AuthorizationCode {
            code: "c".into(),
            client_id: "client".into(),
            redirect_uri: "https://claude.ai/oauth/callback".into(),
            code_challenge: None,
            code_challenge_method: None,
            created_at: expires_at - Duration::minutes(10),
            expires_at,
        }
    }

    #[test]
    fn code_expiry_is_exclusive_of_the_deadline() {
        let deadline = Utc::now();
        let code = code_expiring_at(deadline);
        assert!(!code.is_expired(deadline));
        assert!(code.is_expired(deadline + Duration::seconds(1)));
    }

    #[test]
    fn refresh_record_expiry() {
        let deadline = Utc::now();
        let record = RefreshTokenRecord {
            token: "r".into(),
            client_id: "client".into(),
            expires_at: deadline,
        };
        assert!(!record.is_expired(deadline - Duration::days(1)));
        assert!(record.is_expired(deadline + Duration::seconds(1)));
    }
}
