use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::system::users::User;
use contracts::usecases::common::UseCaseError;

use crate::handlers::common::ApiError;
use crate::routes::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::permissions::Permission;
use crate::system::users::service as user_service;

/// GET /api/system/users/by-staff/:staff_id
pub async fn get_by_staff_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(staff_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    user.require(Permission::ViewDirectory)?;

    match user_service::get_by_staff_id(&state.db, &state.cache, staff_id.trim()).await? {
        Some(found) => Ok(Json(found)),
        None => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            UseCaseError::not_found(format!("No user with Staff # {}", staff_id.trim())),
        )),
    }
}
