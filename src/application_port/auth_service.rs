use crate::application_port::PipelineError;
use crate::domain_model::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    UserExists,
    #[error("server returned no refresh token")]
    MissingRefreshToken,
    #[error("invalid auth payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error(transparent)]
    Api(#[from] PipelineError),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub rights: Vec<String>,
}

/// Body of the login, register and refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, input: LoginInput) -> Result<User, AuthError>;
    async fn register(&self, input: RegisterInput) -> Result<User, AuthError>;
    /// Always clears the local session, even when the server call fails.
    async fn logout(&self) -> Result<(), AuthError>;
    async fn current_user_id(&self) -> Option<UserId>;
}
