// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use crate::infrastructure::stream::SessionHub;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub hub: Arc<SessionHub>,
}
