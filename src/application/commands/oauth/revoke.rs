// src/application/commands/oauth/revoke.rs
use super::OAuthCommandService;
use crate::application::ApplicationResult;

pub struct RevokeTokenCommand {
    pub token: Option<String>,
    pub token_type_hint: Option<String>,
}

impl OAuthCommandService {
    /// Revocation always reports success; absence of the token is not an
    /// error. Access tokens are stateless and cannot be revoked early, so
    /// only refresh records are deleted.
    pub async fn revoke(&self, command: RevokeTokenCommand) -> ApplicationResult<()> {
        let Some(token) = command.token.as_deref() else {
            return Ok(());
        };

        let hint_accepts_refresh = matches!(
            command.token_type_hint.as_deref(),
            None | Some("refresh_token")
        );

        if hint_accepts_refresh {
            let removed = self.refresh_tokens.remove(token).await?;
            if removed {
                tracing::info!("refresh token revoked");
            }
        }

        Ok(())
    }
}
