use crate::application_impl::RefreshCoordinator;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

const SESSION_EVENT_CAPACITY: usize = 16;

/// Every authenticated call goes through here: the current access token is
/// attached, auth failures trigger one shared refresh, and the failed
/// request is replayed at most once.
pub struct RequestPipeline {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    coordinator: RefreshCoordinator,
    events: broadcast::Sender<SessionEvent>,
}

impl RequestPipeline {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        routes: &ApiRoutes,
    ) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        let coordinator =
            RefreshCoordinator::new(transport.clone(), store.clone(), events.clone(), routes);
        Self {
            transport,
            store,
            coordinator,
            events,
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Session start/termination notifications, e.g. to send the user back
    /// to the login screen.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, PipelineError> {
        let token = self.store.access_token().await;
        bind_token(&mut request, token.as_ref())?;

        let response = self.transport.execute(&request).await?;
        if response.is_success() {
            return Ok(response);
        }
        if request.is_retried() || !request.is_refreshable() {
            return Err(PipelineError::Status(response));
        }

        // a fatal message on an ordinary call still gets one refresh attempt,
        // which then fails on its own and terminates the session
        let kind = classify_response(CallSite::Api, &response);
        if kind == AuthFailureKind::NotAuthRelated {
            return Err(PipelineError::Status(response));
        }
        debug!(?kind, method = %request.method, path = %request.path, "auth failure, waiting for fresh token");

        let fresh = self.coordinator.ensure_fresh_token(token.as_ref()).await?;
        request.mark_retried();
        bind_token(&mut request, Some(&fresh))?;

        let retry = self.transport.execute(&request).await?;
        if retry.is_success() {
            Ok(retry)
        } else {
            Err(PipelineError::Status(retry))
        }
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, PipelineError> {
        let response = self.send(request).await?;
        Ok(response.json()?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PipelineError> {
        self.send_json(ApiRequest::get(path)).await
    }
}

fn bind_token(request: &mut ApiRequest, token: Option<&AccessToken>) -> Result<(), PipelineError> {
    match token {
        Some(token) => request.set_bearer(token)?,
        None => request.clear_authorization(),
    }
    Ok(())
}
