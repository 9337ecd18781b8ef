// src/application/commands/oauth/refresh.rs
use super::OAuthCommandService;
use crate::application::{ApplicationResult, dto::TokenPairDto, error::ApplicationError};

pub struct RefreshTokenCommand {
    pub grant_type: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
}

impl OAuthCommandService {
    /// Rotate a refresh token: the old record is consumed atomically, a new
    /// access/refresh pair is issued, and the old token can never succeed
    /// again.
    pub async fn refresh(&self, command: RefreshTokenCommand) -> ApplicationResult<TokenPairDto> {
        if command.grant_type.as_deref() != Some("refresh_token") {
            return Err(ApplicationError::unsupported_grant_type(
                "only refresh_token grant type is supported for this endpoint",
            ));
        }

        let token = command
            .refresh_token
            .as_deref()
            .ok_or_else(|| ApplicationError::invalid_grant("invalid refresh token"))?;

        let record = self
            .refresh_tokens
            .consume(token)
            .await?
            .ok_or_else(|| ApplicationError::invalid_grant("invalid refresh token"))?;

        if record.is_expired(self.clock.now()) {
            // Already consumed; an expired record stays deleted.
            return Err(ApplicationError::invalid_grant("refresh token has expired"));
        }

        if command.client_id.as_deref() != Some(record.client_id.as_str()) {
            // A mismatched client must not burn another client's live token;
            // reinstate the record consumed above.
            self.refresh_tokens.insert(record).await?;
            return Err(ApplicationError::invalid_client(
                "client authentication failed",
            ));
        }

        self.issue_token_pair(&record.client_id).await
    }
}
