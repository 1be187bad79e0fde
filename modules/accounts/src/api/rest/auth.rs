//! Bearer-token authentication for REST handlers of any module.
//!
//! Routes that use [`CurrentUser`] must carry an
//! `Extension<Arc<dyn AccountsApi>>` layer.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap, StatusCode};
use uuid::Uuid;

use appkit::ProblemResponse;

use crate::api::rest::error::{from_parts, unauthenticated};
use crate::contract::client::AccountsApi;
use crate::contract::error::AccountsError;

/// The user owning the request's session token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn extract_current_user(parts: &Parts) -> Result<CurrentUser, ProblemResponse> {
    let instance = parts.uri.path();
    let accounts = parts
        .extensions
        .get::<Arc<dyn AccountsApi>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("route uses CurrentUser without an AccountsApi extension");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ACCOUNTS_INTERNAL",
                "Internal error",
                "Authentication is not configured",
                instance,
            )
        })?;

    let token = bearer_token(&parts.headers)
        .ok_or_else(|| unauthenticated("Missing bearer token", instance))?;

    match accounts.authenticate(token).await {
        Ok(user) => Ok(CurrentUser {
            id: user.id,
            username: user.username,
        }),
        Err(AccountsError::Unauthenticated | AccountsError::NotFound { .. }) => Err(
            unauthenticated("Session is invalid or has expired", instance),
        ),
        Err(AccountsError::Internal) => Err(from_parts(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ACCOUNTS_INTERNAL",
            "Internal error",
            "An internal error occurred",
            instance,
        )),
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move { extract_current_user(parts).await }
    }
}
