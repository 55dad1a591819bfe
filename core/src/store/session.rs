//! Bearer token and user id of the signed-in account.

use std::sync::Arc;

use crate::error::StorageResult;
use crate::types::AuthSession;

use super::KeyValueStore;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const USER_ID_KEY: &str = "userId";

#[derive(Debug, Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Token attached to authenticated requests, if a non-empty one is stored.
    pub fn access_token(&self) -> StorageResult<Option<String>> {
        Ok(self.kv.get(ACCESS_TOKEN_KEY)?.filter(|token| !token.trim().is_empty()))
    }

    pub fn user_id(&self) -> StorageResult<Option<u64>> {
        Ok(self.kv.get(USER_ID_KEY)?.and_then(|raw| raw.trim().parse().ok()))
    }

    pub fn is_logged_in(&self) -> StorageResult<bool> {
        Ok(self.access_token()?.is_some())
    }

    pub fn save(&self, session: &AuthSession) -> StorageResult<()> {
        self.kv.set(ACCESS_TOKEN_KEY, &session.access_token)?;
        self.kv.set(USER_ID_KEY, &session.user_id.to_string())
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.kv.remove(ACCESS_TOKEN_KEY)?;
        self.kv.remove(USER_ID_KEY)
    }
}
