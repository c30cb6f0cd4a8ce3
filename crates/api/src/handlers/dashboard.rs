use axum::extract::{Path, State};
use axum::Json;
use breakdown_core::error::CoreError;
use breakdown_core::types::DbId;
use breakdown_db::models::dashboard::Dashboard;
use breakdown_db::repositories::DashboardRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::owned_movie;
use crate::middleware::acting_user::ActingUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/movies/{movie_id}/dashboard
pub async fn get(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    owned_movie(&state, &user, movie_id).await?;
    let dashboard = DashboardRepo::for_movie(&state.pool, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;
    Ok(Json(DataResponse { data: dashboard }))
}
