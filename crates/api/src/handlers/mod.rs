//! HTTP handler functions.
//!
//! Each submodule provides async handler functions (create, list, get_by_id,
//! update, delete) for one resource. Movie-scoped handlers first confirm the
//! acting user owns the movie in the path.

pub mod character;
pub mod dashboard;
pub mod me;
pub mod montage;
pub mod movie;
pub mod scene;
pub mod search;

use breakdown_core::error::CoreError;
use breakdown_core::types::DbId;
use breakdown_db::models::movie::Movie;
use breakdown_db::repositories::MovieRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::acting_user::ActingUser;
use crate::state::AppState;

/// Load `movie_id` if the acting user owns it, otherwise 404.
pub(crate) async fn owned_movie(
    state: &AppState,
    user: &ActingUser,
    movie_id: DbId,
) -> AppResult<Movie> {
    MovieRepo::find_for_user(&state.pool, user.user_id, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))
}
