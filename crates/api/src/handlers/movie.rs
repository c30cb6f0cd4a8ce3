//! Handlers for the `/movies` resource.
//!
//! Creating, editing, or selecting a movie makes it the acting user's
//! default; deleting one removes its characters, scenes, cast rows, and
//! montage sequences.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use breakdown_core::error::CoreError;
use breakdown_core::types::DbId;
use breakdown_db::models::movie::{
    CreateMovie, DefaultMovie, Movie, MovieChoice, MovieSummary, UpdateMovie,
};
use breakdown_db::repositories::MovieRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::owned_movie;
use crate::middleware::acting_user::ActingUser;
use crate::query::ListParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Movie", id })
}

/// POST /api/v1/movies
pub async fn create(
    State(state): State<AppState>,
    user: ActingUser,
    Json(input): Json<CreateMovie>,
) -> AppResult<(StatusCode, Json<DataResponse<Movie>>)> {
    let movie = MovieRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(movie_id = %movie.id, user_id = %user.user_id, "Movie created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: movie })))
}

/// GET /api/v1/movies?page=&limit=&search=
pub async fn list(
    State(state): State<AppState>,
    user: ActingUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<MovieSummary>>>> {
    let paging = params.paging();
    let items = MovieRepo::list(
        &state.pool,
        user.user_id,
        params.pattern().as_deref(),
        paging.limit,
        paging.offset,
    )
    .await?;
    tracing::debug!(count = items.len(), page = paging.page, "Listed movies");
    Ok(Json(DataResponse {
        data: Page {
            items,
            page: paging.page,
            limit: paging.limit,
        },
    }))
}

/// GET /api/v1/movies/picker
pub async fn picker(
    State(state): State<AppState>,
    user: ActingUser,
) -> AppResult<Json<DataResponse<Vec<MovieChoice>>>> {
    let choices = MovieRepo::list_choices(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: choices }))
}

/// GET /api/v1/movies/default
pub async fn get_default(
    State(state): State<AppState>,
    user: ActingUser,
) -> AppResult<Json<DataResponse<DefaultMovie>>> {
    let movie = MovieRepo::find_default(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: movie }))
}

/// GET /api/v1/movies/{movie_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Movie>>> {
    let movie = owned_movie(&state, &user, movie_id).await?;
    Ok(Json(DataResponse { data: movie }))
}

/// PUT /api/v1/movies/{movie_id}
pub async fn update(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
    Json(input): Json<UpdateMovie>,
) -> AppResult<Json<DataResponse<Movie>>> {
    let movie = MovieRepo::update(&state.pool, user.user_id, movie_id, &input)
        .await?
        .ok_or_else(|| not_found(movie_id))?;
    tracing::info!(%movie_id, "Movie updated");
    Ok(Json(DataResponse { data: movie }))
}

/// PUT /api/v1/movies/{movie_id}/default
pub async fn select_default(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Movie>>> {
    let movie = MovieRepo::set_default(&state.pool, user.user_id, movie_id)
        .await?
        .ok_or_else(|| not_found(movie_id))?;
    tracing::info!(%movie_id, "Default movie selected");
    Ok(Json(DataResponse { data: movie }))
}

/// DELETE /api/v1/movies/{movie_id}
pub async fn delete(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if MovieRepo::delete(&state.pool, user.user_id, movie_id).await? {
        tracing::info!(%movie_id, "Movie deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(movie_id))
    }
}
