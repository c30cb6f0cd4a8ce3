//! Handler for the acting user's own record.

use axum::extract::State;
use axum::Json;
use breakdown_core::error::CoreError;
use breakdown_db::models::user::User;
use breakdown_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::acting_user::ActingUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me
pub async fn get(
    State(state): State<AppState>,
    user: ActingUser,
) -> AppResult<Json<DataResponse<User>>> {
    let record = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse { data: record }))
}
