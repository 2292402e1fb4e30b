use crate::domain_model::*;
use crate::domain_port::TokenStore;
use crate::infra_store::slots::{DEFAULT_SLOT_TTL_DAYS, TokenSlots};
use chrono::{Duration, Utc};
use parking_lot::RwLock;

pub struct MemoryTokenStore {
    slots: RwLock<TokenSlots>,
    ttl: Duration,
}

impl MemoryTokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: RwLock::new(TokenSlots::default()),
            ttl,
        }
    }

    pub fn with_pair(pair: &TokenPair) -> Self {
        let store = Self::default();
        *store.slots.write() = TokenSlots::filled(pair, store.ttl, Utc::now());
        store
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new(Duration::days(DEFAULT_SLOT_TTL_DAYS))
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Option<TokenPair> {
        self.slots.read().pair(Utc::now())
    }

    async fn set(&self, pair: &TokenPair) {
        *self.slots.write() = TokenSlots::filled(pair, self.ttl, Utc::now());
    }

    async fn clear(&self) {
        *self.slots.write() = TokenSlots::default();
    }

    async fn access_token(&self) -> Option<AccessToken> {
        self.slots.read().access_token(Utc::now())
    }

    async fn refresh_token(&self) -> Option<RefreshToken> {
        self.slots.read().refresh_token(Utc::now())
    }

    async fn user_id(&self) -> Option<UserId> {
        self.slots.read().user_id(Utc::now())
    }
}
