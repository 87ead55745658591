//! AuthUser extractor for Axum handlers.
//!
//! Extracts the authenticated user's identity from request extensions
//! (populated by the `require_auth` middleware).

use crate::api::handlers::{AppError, ChartsState};
use crate::auth::jwt::{Claims, USER_TYPE_USER};
use crate::profile::UserId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Authenticated user identity extracted from JWT claims.
///
/// Users below the regular user type are refused with 403.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub user_type: u8,
}

impl AuthUser {
    fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

        if claims.user_type < USER_TYPE_USER {
            return Err(AppError::Forbidden(
                "No permissions to referred object or it does not exist!".to_string(),
            ));
        }

        Ok(Self {
            user_id,
            user_type: claims.user_type,
        })
    }
}

impl FromRequestParts<ChartsState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &ChartsState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async {
            let claims = parts.extensions.get::<Claims>().ok_or_else(|| {
                AppError::Unauthorized("Authentication required, no claims in request".to_string())
            })?;

            Self::from_claims(claims)
        }
    }
}
