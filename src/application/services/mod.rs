// src/application/services/mod.rs
use std::sync::Arc;
use std::time::Duration;

use crate::{
    application::{
        commands::oauth::OAuthCommandService,
        dto::AuthenticatedClient,
        ports::{
            AuthorizationCodeStorePort, ClockPort, ControlPlanePort, RefreshTokenStorePort,
            TokenGeneratorPort, TokenManagerPort,
        },
    },
    domain::policy::ApprovalPolicy,
};

pub struct ApplicationServices {
    pub oauth_commands: Arc<OAuthCommandService>,
    token_manager: Arc<TokenManagerPort>,
    control_plane: Arc<ControlPlanePort>,
    clock: Arc<ClockPort>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        codes: Arc<AuthorizationCodeStorePort>,
        refresh_tokens: Arc<RefreshTokenStorePort>,
        token_manager: Arc<TokenManagerPort>,
        token_generator: Arc<TokenGeneratorPort>,
        control_plane: Arc<ControlPlanePort>,
        clock: Arc<ClockPort>,
        policy: ApprovalPolicy,
        code_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let oauth_commands = Arc::new(OAuthCommandService::new(
            codes,
            refresh_tokens,
            Arc::clone(&token_manager),
            token_generator,
            Arc::clone(&clock),
            policy,
            code_ttl,
            refresh_ttl,
        ));

        Self {
            oauth_commands,
            token_manager,
            control_plane,
            clock,
        }
    }

    pub fn token_manager(&self) -> Arc<TokenManagerPort> {
        Arc::clone(&self.token_manager)
    }

    pub fn control_plane(&self) -> Arc<ControlPlanePort> {
        Arc::clone(&self.control_plane)
    }

    pub fn clock(&self) -> Arc<ClockPort> {
        Arc::clone(&self.clock)
    }

    /// Verify a raw bearer token. Consolidated here so presentation-layer
    /// extractors delegate instead of reimplementing the checks.
    pub async fn authenticate_client(
        &self,
        token: &str,
    ) -> crate::application::ApplicationResult<AuthenticatedClient> {
        self.token_manager.verify(token).await
    }
}
