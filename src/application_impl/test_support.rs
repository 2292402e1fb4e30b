use crate::domain_model::*;
use crate::domain_port::{HttpTransport, TransportError};
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync;

/// In-process backend: answers every request through a closure and keeps a
/// log of what was sent.
pub(crate) struct ScriptedTransport {
    handler: Box<Handler>,
    delays: HashMap<String, Duration>,
    log: Mutex<Vec<ApiRequest>>,
    returned: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(
        handler: impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            delays: HashMap::new(),
            log: Mutex::new(Vec::new()),
            returned: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.log.lock().iter().filter(|r| r.path == path).count()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.log
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.log.lock().last().cloned()
    }

    /// Calls that have finished, as opposed to merely started.
    pub fn returned(&self) -> usize {
        self.returned.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.log.lock().push(request.clone());
        if let Some(delay) = self.delays.get(&request.path) {
            tokio::time::sleep(*delay).await;
        }
        let response = (self.handler)(request);
        self.returned.fetch_add(1, Ordering::SeqCst);
        response
    }
}

pub(crate) fn respond(status: StatusCode, body: Value) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::json_body(status, &body))
}

pub(crate) fn refresh_ok(access_token: &str) -> Result<ApiResponse, TransportError> {
    respond(
        StatusCode::OK,
        json!({"accessToken": access_token, "user": {"id": "user-1"}}),
    )
}

/// Ordinary endpoints accept only `Bearer <valid>`; anything else is a 401.
pub(crate) fn guarded(request: &ApiRequest, valid: &str) -> Result<ApiResponse, TransportError> {
    if request.authorization() == Some(format!("Bearer {valid}").as_str()) {
        respond(StatusCode::OK, json!({"path": request.path}))
    } else {
        respond(StatusCode::UNAUTHORIZED, json!({"message": "jwt expired"}))
    }
}
