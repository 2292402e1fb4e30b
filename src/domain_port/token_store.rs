use crate::domain_model::*;

/// Durable storage for the signed-in user's credentials.
///
/// Implementations never fail loudly: unavailable or corrupt storage reads
/// as "absent" and failed writes are logged.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// The full pair, only when every slot is present and unexpired.
    async fn get(&self) -> Option<TokenPair>;
    async fn set(&self, pair: &TokenPair);
    async fn clear(&self);

    async fn access_token(&self) -> Option<AccessToken>;
    async fn refresh_token(&self) -> Option<RefreshToken>;
    async fn user_id(&self) -> Option<UserId>;
}
