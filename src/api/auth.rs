//! Caller identity extraction from upstream-proxy headers.
//!
//! Authentication transport lives upstream; by the time a request
//! reaches this service the proxy has validated the session and injected
//! `x-user-id` and `x-user-role` headers. The extractor turns those into
//! an [`AuthUser`] or rejects the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::domain::{AuthUser, Role};
use crate::error::AppError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Forbidden(format!("missing identity header: {name}")))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id: Uuid = header_value(parts, USER_ID_HEADER)?
            .parse()
            .map_err(|_| AppError::Validation("malformed x-user-id header".into()))?;
        let role: Role = header_value(parts, USER_ROLE_HEADER)?
            .parse()
            .map_err(|_| AppError::Validation("malformed x-user-role header".into()))?;
        Ok(Self { id, role })
    }
}
