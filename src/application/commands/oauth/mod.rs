// src/application/commands/oauth/mod.rs
mod authorize;
mod exchange;
mod refresh;
mod revoke;
mod service;

pub use authorize::{AuthorizeCommand, AuthorizeOutcome, ConsentPrompt};
pub use exchange::ExchangeCodeCommand;
pub use refresh::RefreshTokenCommand;
pub use revoke::RevokeTokenCommand;
pub use service::OAuthCommandService;
