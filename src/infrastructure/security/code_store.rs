// src/infrastructure/security/code_store.rs
use crate::application::ApplicationResult;
use crate::application::ports::credentials::AuthorizationCodeStore;
use crate::domain::credentials::AuthorizationCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Volatile in-process store. `HashMap::remove` under a single lock gives
/// the atomic check-and-delete the consumption contract requires.
#[derive(Default)]
pub struct InMemoryAuthorizationCodeStore {
    // code -> AuthorizationCode
    inner: Mutex<HashMap<String, AuthorizationCode>>,
}

impl InMemoryAuthorizationCodeStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryAuthorizationCodeStore {
    async fn insert(&self, code: AuthorizationCode) -> ApplicationResult<()> {
        let mut guard = self.inner.lock().unwrap();
        guard.insert(code.code.clone(), code);
        Ok(())
    }

    async fn consume(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        let mut guard = self.inner.lock().unwrap();
        Ok(guard.remove(code))
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut guard = self.inner.lock().unwrap();
        let before = guard.len();
        guard.retain(|_, code| !code.is_expired(now));
        Ok(before - guard.len())
    }
}

pub fn into_arc(store: InMemoryAuthorizationCodeStore) -> Arc<dyn AuthorizationCodeStore> {
    Arc::new(store)
}
