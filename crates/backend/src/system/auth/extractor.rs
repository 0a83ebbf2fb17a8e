use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::TokenClaims;
use contracts::usecases::common::UseCaseError;

use super::permissions::{has_permission, Permission};
use crate::handlers::common::ApiError;

/// Principal of an authenticated request (claims set by `require_auth`)
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        if has_permission(self.0.role, permission) {
            Ok(())
        } else {
            Err(ApiError::new(
                StatusCode::FORBIDDEN,
                UseCaseError::forbidden("You do not have permission to perform this action"),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::UNAUTHORIZED,
                    UseCaseError::new("UNAUTHORIZED", "Authentication required"),
                )
            })
    }
}
