// src/application/commands/oauth/authorize.rs
use super::OAuthCommandService;
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::credentials::AuthorizationCode;
use crate::domain::policy::ANONYMOUS_CLIENT;
use url::Url;

pub struct AuthorizeCommand {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    /// Set by the consent form round-trip; once present the request is
    /// trusted as user-approved.
    pub auto_approve: bool,
}

/// Parameters echoed into the consent form so submission re-enters the same
/// flow with `auto_approve` set.
#[derive(Debug, Clone)]
pub struct ConsentPrompt {
    pub client_id: Option<String>,
    pub redirect_uri: String,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

/// Terminal outcomes of an authorization request.
pub enum AuthorizeOutcome {
    /// 302 target carrying `code` (and `state` when supplied).
    Redirect(String),
    /// Manual consent required; render the approval form.
    ConsentRequired(ConsentPrompt),
}

impl OAuthCommandService {
    pub async fn authorize(
        &self,
        command: AuthorizeCommand,
    ) -> ApplicationResult<AuthorizeOutcome> {
        if command.response_type.as_deref() != Some("code") {
            return Err(ApplicationError::invalid_request(
                "response_type must be \"code\"",
            ));
        }

        // Without a redirect target there is nowhere to deliver the code.
        let redirect_uri = command.redirect_uri.clone().ok_or_else(|| {
            ApplicationError::invalid_request("redirect_uri is required")
        })?;

        let approved = command.auto_approve
            || self
                .policy
                .auto_approves(command.client_id.as_deref(), &redirect_uri);

        if !approved {
            return Ok(AuthorizeOutcome::ConsentRequired(ConsentPrompt {
                client_id: command.client_id,
                redirect_uri,
                state: command.state,
                code_challenge: command.code_challenge,
                code_challenge_method: command.code_challenge_method,
            }));
        }

        let location = self.approve(command, redirect_uri).await?;
        Ok(AuthorizeOutcome::Redirect(location))
    }

    async fn approve(
        &self,
        command: AuthorizeCommand,
        redirect_uri: String,
    ) -> ApplicationResult<String> {
        // The redirect goes back to the exact URI the caller supplied; parse
        // up front so an unusable target fails before a code is minted.
        let mut location = Url::parse(&redirect_uri).map_err(|_| {
            ApplicationError::invalid_request("redirect_uri is not a valid URL")
        })?;

        let now = self.clock.now();
        let code = self.token_generator.generate();
        let client_id = command
            .client_id
            .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string());

        self.codes
            .insert(AuthorizationCode {
                code: code.clone(),
                client_id: client_id.clone(),
                redirect_uri,
                code_challenge: command.code_challenge,
                code_challenge_method: command.code_challenge_method,
                created_at: now,
                expires_at: now + self.code_ttl,
            })
            .await?;

        tracing::info!(client_id, "authorization code issued");

        location.query_pairs_mut().append_pair("code", &code);
        if let Some(state) = command.state.as_deref() {
            location.query_pairs_mut().append_pair("state", state);
        }

        Ok(location.into())
    }
}
