//! Mutation authorization extractor.
//!
//! Credential verification lives upstream (the auth gateway terminates the
//! session and stamps `x-authorized-role` on requests it forwards). This
//! extractor only consumes that decision: mutating handlers require the
//! `manager` role, everything else is read-only and unguarded.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// Header stamped by the upstream auth gateway.
pub const ROLE_HEADER: &str = "x-authorized-role";

/// Role permitted to mutate the catalog.
pub const ROLE_MANAGER: &str = "manager";

/// Proof that the upstream gateway authorized this caller to mutate.
///
/// Use as an extractor parameter in any handler that writes:
///
/// ```ignore
/// async fn create_product(_gate: MutatorGate, ...) -> AppResult<impl IntoResponse>
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MutatorGate;

impl<S> FromRequestParts<S> for MutatorGate
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Forbidden("Caller is not authorized to mutate".into()))?;

        if role != ROLE_MANAGER {
            return Err(AppError::Forbidden(format!(
                "Role '{role}' is not authorized to mutate"
            )));
        }
        Ok(MutatorGate)
    }
}
