use crate::domain_model::*;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SLOT_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Slot {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl Slot {
    fn live(&self, now: DateTime<Utc>) -> Option<&str> {
        (now < self.expires_at && !self.value.is_empty()).then_some(self.value.as_str())
    }
}

/// The three independently expiring credential slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TokenSlots {
    pub access_token: Option<Slot>,
    pub refresh_token: Option<Slot>,
    pub user_id: Option<Slot>,
}

impl TokenSlots {
    pub fn filled(pair: &TokenPair, ttl: Duration, now: DateTime<Utc>) -> Self {
        let slot = |value: &str| {
            Some(Slot {
                value: value.to_string(),
                expires_at: now + ttl,
            })
        };
        Self {
            access_token: slot(&pair.access_token.0),
            refresh_token: slot(&pair.refresh_token.0),
            user_id: slot(&pair.user_id.0),
        }
    }

    pub fn access_token(&self, now: DateTime<Utc>) -> Option<AccessToken> {
        live(&self.access_token, now).map(AccessToken)
    }

    pub fn refresh_token(&self, now: DateTime<Utc>) -> Option<RefreshToken> {
        live(&self.refresh_token, now).map(RefreshToken)
    }

    pub fn user_id(&self, now: DateTime<Utc>) -> Option<UserId> {
        live(&self.user_id, now).map(UserId)
    }

    pub fn pair(&self, now: DateTime<Utc>) -> Option<TokenPair> {
        Some(TokenPair {
            access_token: self.access_token(now)?,
            refresh_token: self.refresh_token(now)?,
            user_id: self.user_id(now)?,
        })
    }
}

fn live(slot: &Option<Slot>, now: DateTime<Utc>) -> Option<String> {
    slot.as_ref()?.live(now).map(str::to_owned)
}
