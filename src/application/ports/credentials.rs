// src/application/ports/credentials.rs
use crate::application::ApplicationResult;
use crate::domain::credentials::{AuthorizationCode, RefreshTokenRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store for single-use authorization codes. `consume` must be an atomic
/// check-and-delete: at most one concurrent redemption can observe a given
/// code, whatever the later validation outcome.
#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    async fn insert(&self, code: AuthorizationCode) -> ApplicationResult<()>;
    /// Atomically remove the code and return the stored value if present.
    async fn consume(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>>;
    /// Drop expired codes; returns how many were removed.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize>;
}

/// Store for refresh-token records. Same atomic consumption contract as the
/// code store; rotation consumes the old record before the new one exists.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert(&self, record: RefreshTokenRecord) -> ApplicationResult<()>;
    /// Atomically remove the record and return the stored value if present.
    async fn consume(&self, token: &str) -> ApplicationResult<Option<RefreshTokenRecord>>;
    /// Best-effort removal for revocation; absence is not an error.
    async fn remove(&self, token: &str) -> ApplicationResult<bool>;
    /// Drop expired records; returns how many were removed.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize>;
}
