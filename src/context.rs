//! Per-request tenancy context: `UserContext` and the header-gate
//! extractors that populate and validate it.
//!
//! Header extraction → trim/validate → single canonical rejection on
//! failure, the same shape as a bearer-token auth extractor, but keyed
//! on two plain headers instead of a JWT.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::CashFlowError;

pub const USER_ID_HEADER: &str = "X-Vire-User-ID";
pub const NAVEXA_KEY_HEADER: &str = "X-Vire-Navexa-Key";
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// Request-scoped identity + injected upstream credential. A plain value
/// type: `Clone`, no interior mutability, and never carries the
/// request's cancellation signal, so it is safe to copy the fields you
/// need into background work that outlives the request.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub navexa_key: String,
    pub correlation_id: Option<String>,
}

impl UserContext {
    /// Both fields must be non-empty after trimming. Used by every
    /// Navexa-dependent handler before any side effect.
    pub fn require_navexa(&self) -> Result<(), CashFlowError> {
        if self.user_id.trim().is_empty() || self.navexa_key.trim().is_empty() {
            return Err(CashFlowError::Configuration);
        }
        Ok(())
    }
}

/// Extractor for handlers that only need a user id (no Navexa credential
/// required) — e.g. plain cash-flow ledger CRUD, which is local to our
/// own storage and never calls out to Navexa.
pub struct RequireUserId(pub String);

impl<S> FromRequestParts<S> for RequireUserId
where
    S: Send + Sync,
{
    type Rejection = CashFlowError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER);
        if user_id.trim().is_empty() {
            return Err(CashFlowError::Configuration);
        }
        Ok(RequireUserId(user_id))
    }
}

/// Extractor for Navexa-dependent handlers: both headers must be present
/// and non-blank, or the request is rejected before any side effect with
/// the canonical `{"error": "configuration not correct"}` body.
pub struct RequireNavexaContext(pub UserContext);

impl<S> FromRequestParts<S> for RequireNavexaContext
where
    S: Send + Sync,
{
    type Rejection = CashFlowError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = UserContext {
            user_id: header_value(parts, USER_ID_HEADER).trim().to_string(),
            navexa_key: header_value(parts, NAVEXA_KEY_HEADER).trim().to_string(),
            correlation_id: correlation_id(parts),
        };
        ctx.require_navexa()?;
        Ok(RequireNavexaContext(ctx))
    }
}

fn header_value(parts: &Parts, name: &str) -> String {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Carried through for log correlation only; never validated, never
/// required. Absent when the caller doesn't send it.
fn correlation_id(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
