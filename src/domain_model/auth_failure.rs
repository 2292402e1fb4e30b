use crate::domain_model::ApiResponse;
use reqwest::StatusCode;

pub const JWT_EXPIRED: &str = "jwt expired";
pub const JWT_MUST_BE_PROVIDED: &str = "jwt must be provided";
pub const REFRESH_TOKEN_NOT_PASSED: &str = "Refresh token not passed";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";

/// Which call produced the failure. `"jwt expired"` means something
/// different on the refresh endpoint than on an ordinary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSite {
    Api,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    NotAuthRelated,
    NeedsRefresh,
    FatalAuthFailure,
}

pub fn classify(call_site: CallSite, status: StatusCode, message: Option<&str>) -> AuthFailureKind {
    match message {
        Some(REFRESH_TOKEN_NOT_PASSED | INVALID_REFRESH_TOKEN) => {
            return AuthFailureKind::FatalAuthFailure;
        }
        Some(JWT_EXPIRED) => {
            return match call_site {
                CallSite::Refresh => AuthFailureKind::FatalAuthFailure,
                CallSite::Api => AuthFailureKind::NeedsRefresh,
            };
        }
        _ => {}
    }

    if status == StatusCode::UNAUTHORIZED || message == Some(JWT_MUST_BE_PROVIDED) {
        AuthFailureKind::NeedsRefresh
    } else {
        AuthFailureKind::NotAuthRelated
    }
}

pub fn classify_response(call_site: CallSite, response: &ApiResponse) -> AuthFailureKind {
    classify(
        call_site,
        response.status,
        response.error_message().as_deref(),
    )
}
