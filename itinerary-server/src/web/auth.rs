//! Caller identity.
//!
//! Token verification happens in the gateway in front of this service,
//! which forwards the verified account id in `X-User-Id`.

use axum::http::HeaderMap;

use crate::domain::UserId;

use super::routes::AppError;

/// Header carrying the verified account id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The calling rider, or `None` for anonymous requests.
///
/// A present but malformed header is rejected rather than treated as
/// anonymous.
pub fn caller(headers: &HeaderMap) -> Result<Option<UserId>, AppError> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|id| Some(UserId::new(id)))
        .ok_or_else(|| AppError::BadRequest {
            message: format!("invalid {USER_ID_HEADER} header"),
        })
}

/// The calling rider; anonymous requests are rejected.
pub fn require_caller(headers: &HeaderMap) -> Result<UserId, AppError> {
    caller(headers)?.ok_or_else(|| AppError::Unauthorized {
        message: "authentification requise".to_string(),
    })
}
