// src/application/ports/mod.rs
pub mod control_plane;
pub mod credentials;
pub mod security;
pub mod time;
pub mod util;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type AuthorizationCodeStorePort = dyn credentials::AuthorizationCodeStore;
pub type RefreshTokenStorePort = dyn credentials::RefreshTokenStore;
pub type TokenManagerPort = dyn security::TokenManager;
pub type ControlPlanePort = dyn control_plane::ControlPlane;
pub type ClockPort = dyn time::Clock;
pub type TokenGeneratorPort = dyn util::TokenGenerator;
