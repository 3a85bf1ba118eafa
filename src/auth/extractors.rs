use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys};
use crate::error::AppError;

/// Verified claims of the bearer token sent in `Authorization`.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AppError::MissingToken)?
            .to_str()
            .map_err(|_| AppError::InvalidToken)?;

        // "<scheme> <token>"
        let mut pieces = header.split_whitespace();
        let scheme = pieces.next().unwrap_or_default();
        let token = pieces.next().ok_or(AppError::MissingToken)?;
        if !scheme.eq_ignore_ascii_case("bearer") || pieces.next().is_some() {
            return Err(AppError::InvalidToken);
        }

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token verification failed");
            AppError::InvalidToken
        })?;

        Ok(AuthUser(claims))
    }
}
