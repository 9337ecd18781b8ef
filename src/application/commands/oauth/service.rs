// src/application/commands/oauth/service.rs
use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    ApplicationResult,
    dto::TokenPairDto,
    ports::{
        AuthorizationCodeStorePort, ClockPort, RefreshTokenStorePort, TokenGeneratorPort,
        TokenManagerPort,
    },
};
use crate::domain::credentials::RefreshTokenRecord;
use crate::domain::policy::ApprovalPolicy;

pub struct OAuthCommandService {
    pub(super) codes: Arc<AuthorizationCodeStorePort>,
    pub(super) refresh_tokens: Arc<RefreshTokenStorePort>,
    pub(super) token_manager: Arc<TokenManagerPort>,
    pub(super) token_generator: Arc<TokenGeneratorPort>,
    pub(super) clock: Arc<ClockPort>,
    pub(super) policy: ApprovalPolicy,
    pub(super) code_ttl: chrono::Duration,
    pub(super) refresh_ttl: chrono::Duration,
}

impl OAuthCommandService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        codes: Arc<AuthorizationCodeStorePort>,
        refresh_tokens: Arc<RefreshTokenStorePort>,
        token_manager: Arc<TokenManagerPort>,
        token_generator: Arc<TokenGeneratorPort>,
        clock: Arc<ClockPort>,
        policy: ApprovalPolicy,
        code_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            codes,
            refresh_tokens,
            token_manager,
            token_generator,
            clock,
            policy,
            code_ttl: duration_to_chrono(code_ttl),
            refresh_ttl: duration_to_chrono(refresh_ttl),
        }
    }

    /// Mint and persist a fresh access/refresh pair for `client_id`. Shared
    /// terminal step of both grant flows.
    pub(super) async fn issue_token_pair(
        &self,
        client_id: &str,
    ) -> ApplicationResult<TokenPairDto> {
        let access = self.token_manager.issue(client_id).await?;
        let refresh_token = self.token_generator.generate();
        let now = self.clock.now();

        self.refresh_tokens
            .insert(RefreshTokenRecord {
                token: refresh_token.clone(),
                client_id: client_id.to_string(),
                expires_at: now + self.refresh_ttl,
            })
            .await?;

        tracing::info!(client_id, "issued token pair");

        Ok(TokenPairDto::bearer(
            access.token,
            access.expires_in,
            refresh_token,
        ))
    }
}

fn duration_to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration)
        .unwrap_or_else(|_| chrono::Duration::seconds(duration.as_secs() as i64))
}
