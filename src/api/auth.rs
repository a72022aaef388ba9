//! Bearer-token guard for the admin routes.

use std::fmt;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use sha2::{Digest, Sha256};

use crate::app_state::AppState;
use crate::error::ApiError;

/// The configured admin token, kept only as a SHA-256 digest.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminToken(Vec<u8>);

impl AdminToken {
    /// Digests `token`.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self(Sha256::digest(token.as_bytes()).to_vec())
    }

    /// Compares digests so the comparison time does not depend on how
    /// much of the raw token matched.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        Sha256::digest(presented.as_bytes()).as_slice() == self.0.as_slice()
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(..)")
    }
}

/// Rejects admin requests without a valid `Authorization: Bearer` header.
///
/// # Errors
///
/// [`ApiError::Unauthorized`] if the header is missing or wrong.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = &state.admin_token else {
        return Ok(next.run(req).await);
    };

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    if !expected.matches(presented.trim()) {
        tracing::warn!(path = %req.uri().path(), "admin request with wrong token");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(req).await)
}
