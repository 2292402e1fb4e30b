use crate::application_impl::RequestPipeline;
use crate::application_port::*;
use crate::domain_model::*;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{info, warn};

/// Login, registration and logout against the backend's `auth/*` routes.
pub struct HttpAuthService {
    pipeline: Arc<RequestPipeline>,
    routes: ApiRoutes,
}

impl HttpAuthService {
    pub fn new(pipeline: Arc<RequestPipeline>, routes: ApiRoutes) -> Self {
        Self { pipeline, routes }
    }

    async fn start_session(&self, response: ApiResponse) -> Result<User, AuthError> {
        let body: AuthResponse = response.json()?;
        let refresh_token = body
            .refresh_token
            .or_else(|| response.cookie(REFRESH_TOKEN_COOKIE))
            .ok_or(AuthError::MissingRefreshToken)?;

        let pair = TokenPair {
            access_token: AccessToken(body.access_token),
            refresh_token: RefreshToken(refresh_token),
            user_id: body.user.id.clone(),
        };
        self.pipeline.store().set(&pair).await;
        info!(user_id = %pair.user_id, "session started");
        self.pipeline.publish(SessionEvent::Started {
            user_id: pair.user_id,
        });

        Ok(body.user)
    }
}

#[async_trait::async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, input: LoginInput) -> Result<User, AuthError> {
        let request =
            ApiRequest::post(self.routes.login(), serde_json::to_value(&input)?).without_refresh();
        let response = self.pipeline.send(request).await.map_err(|e| match e.status() {
            Some(StatusCode::UNAUTHORIZED) => AuthError::InvalidCredentials,
            _ => AuthError::Api(e),
        })?;
        self.start_session(response).await
    }

    async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let request = ApiRequest::post(self.routes.register(), serde_json::to_value(&input)?)
            .without_refresh();
        let response = self.pipeline.send(request).await.map_err(|e| match e.status() {
            Some(StatusCode::CONFLICT) => AuthError::UserExists,
            _ => AuthError::Api(e),
        })?;
        self.start_session(response).await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        if let Err(e) = self.pipeline.send(ApiRequest::get(self.routes.logout())).await {
            warn!(error = %e, "logout request failed, clearing local session anyway");
        }
        self.pipeline.store().clear().await;
        self.pipeline.publish(SessionEvent::Terminated {
            reason: TerminationReason::LoggedOut,
        });
        info!("session ended");
        Ok(())
    }

    async fn current_user_id(&self) -> Option<UserId> {
        self.pipeline.store().user_id().await
    }
}
