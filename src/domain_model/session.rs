use crate::domain_model::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started { user_id: UserId },
    Terminated { reason: TerminationReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    LoggedOut,
    /// The refresh endpoint rejected the session; the user must log in again.
    AuthFailure(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::LoggedOut => write!(f, "logged out"),
            TerminationReason::AuthFailure(reason) => write!(f, "auth failure: {}", reason),
        }
    }
}
