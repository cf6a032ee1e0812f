//! Extraction of the authenticated user identity.
//!
//! Authentication itself happens upstream (a reverse proxy or API gateway
//! that terminates the session); by the time a request reaches this service
//! the verified user ID is carried in the `X-User-Id` header. This module is
//! the single seam through which handlers learn who the caller is.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{Error, database_id::UserId};

/// The header the authenticating proxy uses to pass the verified user ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The verified identity of the requesting user.
///
/// Extracting this from a request that has no usable `X-User-Id` header
/// rejects the request with [Error::Unauthenticated].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<UserId>().ok())
            .map(AuthenticatedUser)
            .ok_or(Error::Unauthenticated)
    }
}
