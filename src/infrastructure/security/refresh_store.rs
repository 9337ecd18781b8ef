// src/infrastructure/security/refresh_store.rs
use crate::application::ApplicationResult;
use crate::application::ports::credentials::RefreshTokenStore;
use crate::domain::credentials::RefreshTokenRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    // refresh token -> record
    inner: Mutex<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn insert(&self, record: RefreshTokenRecord) -> ApplicationResult<()> {
        let mut guard = self.inner.lock().unwrap();
        guard.insert(record.token.clone(), record);
        Ok(())
    }

    async fn consume(&self, token: &str) -> ApplicationResult<Option<RefreshTokenRecord>> {
        let mut guard = self.inner.lock().unwrap();
        Ok(guard.remove(token))
    }

    async fn remove(&self, token: &str) -> ApplicationResult<bool> {
        let mut guard = self.inner.lock().unwrap();
        Ok(guard.remove(token).is_some())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut guard = self.inner.lock().unwrap();
        let before = guard.len();
        guard.retain(|_, record| !record.is_expired(now));
        Ok(before - guard.len())
    }
}

pub fn into_arc(store: InMemoryRefreshTokenStore) -> Arc<dyn RefreshTokenStore> {
    Arc::new(store)
}
