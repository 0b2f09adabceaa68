//! Account scoping.
//!
//! Development: the caller names its account in an `X-Account-Id` header and
//! no credentials are checked. Production: derive the account from a verified
//! session token instead.

use crate::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use leadboard_core::AccountId;
use uuid::Uuid;

pub const ACCOUNT_HEADER: &str = "x-account-id";

/// The account a request acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account(pub AccountId);

#[async_trait]
impl<S> FromRequestParts<S> for Account
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACCOUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::unauthorized("missing_account", "X-Account-Id header required")
            })?;

        Uuid::parse_str(raw.trim())
            .map(Account)
            .map_err(|_| ApiError::unauthorized("invalid_account", "X-Account-Id must be a UUID"))
    }
}
