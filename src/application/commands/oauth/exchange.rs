// src/application/commands/oauth/exchange.rs
use super::OAuthCommandService;
use crate::application::{ApplicationResult, dto::TokenPairDto, error::ApplicationError};
use crate::domain::credentials::AuthorizationCode;
use crate::domain::{pkce, policy};

pub struct ExchangeCodeCommand {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
    pub code_verifier: Option<String>,
}

impl OAuthCommandService {
    /// Redeem an authorization code for a token pair. Validation order is
    /// fixed; the code is consumed before any further check so a failed
    /// attempt can never be retried with the same code.
    pub async fn exchange_code(
        &self,
        command: ExchangeCodeCommand,
    ) -> ApplicationResult<TokenPairDto> {
        if command.grant_type.as_deref() != Some("authorization_code") {
            return Err(ApplicationError::unsupported_grant_type(
                "only authorization_code grant type is supported",
            ));
        }

        let code = command
            .code
            .as_deref()
            .ok_or_else(|| ApplicationError::invalid_grant("invalid authorization code"))?;

        // Delete-on-read, whatever the outcome of the checks below.
        let stored = self
            .codes
            .consume(code)
            .await?
            .ok_or_else(|| ApplicationError::invalid_grant("invalid authorization code"))?;

        if stored.is_expired(self.clock.now()) {
            return Err(ApplicationError::invalid_grant(
                "authorization code has expired",
            ));
        }

        if !self
            .policy
            .client_matches(command.client_id.as_deref(), &stored.client_id)
        {
            return Err(ApplicationError::invalid_client(
                "client authentication failed",
            ));
        }

        match command.redirect_uri.as_deref() {
            Some(uri) if policy::redirect_matches(uri, &stored.redirect_uri) => {}
            _ => {
                return Err(ApplicationError::invalid_grant("redirect URI mismatch"));
            }
        }

        verify_pkce(&stored, command.code_verifier.as_deref())?;

        // Sign the client identity the caller presented; codes minted for
        // anonymous callers fall back to their stored label.
        let client_id = command
            .client_id
            .unwrap_or_else(|| stored.client_id.clone());

        self.issue_token_pair(&client_id).await
    }
}

fn verify_pkce(
    stored: &AuthorizationCode,
    code_verifier: Option<&str>,
) -> ApplicationResult<()> {
    let Some(challenge) = stored.code_challenge.as_deref() else {
        return Ok(());
    };

    // The method was stored verbatim at authorization time; anything other
    // than S256 fails here, at exchange.
    if let Some(method) = stored.code_challenge_method.as_deref() {
        if method != pkce::METHOD_S256 {
            return Err(ApplicationError::invalid_grant(
                "unsupported code_challenge_method",
            ));
        }
    }

    let verifier = code_verifier
        .ok_or_else(|| ApplicationError::invalid_grant("code verifier is invalid"))?;

    if !pkce::verifier_matches(challenge, verifier) {
        return Err(ApplicationError::invalid_grant("code verifier is invalid"));
    }

    Ok(())
}
