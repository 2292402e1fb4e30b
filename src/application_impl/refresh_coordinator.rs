use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

const NO_REFRESH_TOKEN: &str = "no refresh token";

type Outcome = Result<AccessToken, RefreshError>;
type Waiter = oneshot::Sender<Outcome>;

enum RefreshPhase {
    Idle,
    Refreshing { waiters: Vec<Waiter> },
}

struct RefreshState {
    phase: RefreshPhase,
    /// Number of refreshes settled so far.
    settled: u64,
    last_outcome: Option<Outcome>,
}

impl RefreshState {
    fn last_was_fatal(&self) -> bool {
        matches!(&self.last_outcome, Some(Err(e)) if e.is_fatal())
    }
}

/// Single-flight token refresh.
///
/// However many callers ask for a fresh token while a refresh is in flight,
/// exactly one refresh call is made and every caller receives its outcome.
/// The refresh itself runs on a detached task, so it settles even when all
/// of its waiters have been cancelled.
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<RefreshState>,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
    refresh_path: String,
}

impl RefreshCoordinator {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        events: broadcast::Sender<SessionEvent>,
        routes: &ApiRoutes,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(RefreshState {
                    phase: RefreshPhase::Idle,
                    settled: 0,
                    last_outcome: None,
                }),
                transport,
                store,
                events,
                refresh_path: routes.refresh(),
            }),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(
            self.inner.state.lock().phase,
            RefreshPhase::Refreshing { .. }
        )
    }

    /// Returns an access token newer than `stale`, refreshing if needed.
    ///
    /// `stale` is the token the failed request was sent with. When the store
    /// already holds a different token, a refresh has completed since that
    /// request went out and the stored token is returned directly.
    pub async fn ensure_fresh_token(&self, stale: Option<&AccessToken>) -> Outcome {
        // the store read below can suspend; a refresh settling meanwhile
        // shows up as a changed counter
        let seen = self.inner.state.lock().settled;
        let current = self.inner.store.access_token().await;

        let receiver = {
            let mut guard = self.inner.state.lock();
            let state = &mut *guard;
            let (tx, rx) = oneshot::channel();
            if let RefreshPhase::Refreshing { waiters } = &mut state.phase {
                waiters.push(tx);
                debug!(waiters = waiters.len(), "joining in-flight token refresh");
            } else {
                if state.settled != seen {
                    if let Some(outcome) = state.last_outcome.clone() {
                        debug!("token refresh settled while reading the store");
                        return outcome;
                    }
                }
                if let Some(current) = current.filter(|token| Some(token) != stale) {
                    debug!("token already replaced, skipping refresh");
                    return Ok(current);
                }
                state.phase = RefreshPhase::Refreshing { waiters: vec![tx] };
                debug!("starting token refresh");
                tokio::spawn(Inner::run_refresh(self.inner.clone()));
            }
            rx
        };

        receiver.await.unwrap_or(Err(RefreshError::Interrupted))
    }
}

impl Inner {
    async fn run_refresh(self: Arc<Self>) {
        let refresh_token = self.store.refresh_token().await;
        let had_refresh_token = refresh_token.is_some();
        let outcome = match refresh_token {
            Some(refresh_token) => self.refresh_once(refresh_token).await,
            None => Err(RefreshError::Fatal {
                reason: NO_REFRESH_TOKEN.to_string(),
            }),
        };

        match &outcome {
            Err(e) if e.is_fatal() => {
                let announce = had_refresh_token || !self.state.lock().last_was_fatal();
                self.terminate_session(e, announce).await;
            }
            Err(e) => warn!(error = %e, "token refresh failed"),
            Ok(_) => {}
        }
        self.settle(outcome);
    }

    /// Goes back to Idle and hands the outcome to every waiter in arrival
    /// order. A caller arriving later starts a new refresh.
    fn settle(&self, outcome: Outcome) {
        let waiters = {
            let mut state = self.state.lock();
            state.settled += 1;
            state.last_outcome = Some(outcome.clone());
            match std::mem::replace(&mut state.phase, RefreshPhase::Idle) {
                RefreshPhase::Refreshing { waiters } => waiters,
                RefreshPhase::Idle => Vec::new(),
            }
        };
        debug!(
            waiters = waiters.len(),
            success = outcome.is_ok(),
            "token refresh settled"
        );

        for waiter in waiters {
            // the receiver is gone if its caller was cancelled
            let _ = waiter.send(outcome.clone());
        }
    }

    async fn refresh_once(&self, refresh_token: RefreshToken) -> Outcome {
        let request = ApiRequest::post(
            &self.refresh_path,
            json!({ "refreshToken": refresh_token.0 }),
        )
        .without_refresh();
        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        if !response.is_success() {
            let message = response.error_message();
            return Err(
                match classify(CallSite::Refresh, response.status, message.as_deref()) {
                    AuthFailureKind::FatalAuthFailure => RefreshError::Fatal {
                        reason: message.unwrap_or_else(|| response.status.to_string()),
                    },
                    _ => RefreshError::Rejected {
                        status: response.status,
                        message,
                    },
                },
            );
        }

        let body: AuthResponse = response
            .json()
            .map_err(|e| RefreshError::MalformedResponse(e.to_string()))?;
        let rotated = body
            .refresh_token
            .or_else(|| response.cookie(REFRESH_TOKEN_COOKIE))
            .map(RefreshToken);
        let pair = TokenPair {
            access_token: AccessToken(body.access_token),
            refresh_token: rotated.unwrap_or(refresh_token),
            user_id: body.user.id,
        };
        self.store.set(&pair).await;
        info!(user_id = %pair.user_id, "access token refreshed");

        Ok(pair.access_token)
    }

    /// Clears the store. `announce` is false when an earlier refresh already
    /// terminated this session and nothing has signed in since.
    async fn terminate_session(&self, error: &RefreshError, announce: bool) {
        self.store.clear().await;
        if !announce {
            debug!(error = %error, "session already terminated");
            return;
        }

        warn!(error = %error, "session terminated, clearing stored tokens");
        let reason = match error {
            RefreshError::Fatal { reason } => reason.clone(),
            other => other.to_string(),
        };
        // nobody listening is fine
        let _ = self.events.send(SessionEvent::Terminated {
            reason: TerminationReason::AuthFailure(reason),
        });
    }
}
