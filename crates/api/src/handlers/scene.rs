//! Handlers for the `/scenes` resource.
//!
//! Scenes are nested under movies: `/movies/{movie_id}/scenes[/{id}]`.
//! Each write carries the scene's full cast, which replaces the stored one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use breakdown_core::error::CoreError;
use breakdown_core::types::DbId;
use breakdown_db::models::scene::{CreateScene, SceneWithCharacters, UpdateScene};
use breakdown_db::repositories::SceneRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::owned_movie;
use crate::middleware::acting_user::ActingUser;
use crate::query::ListParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Scene", id })
}

/// Re-read a scene with its cast after a write.
async fn load(state: &AppState, movie_id: DbId, id: DbId) -> AppResult<SceneWithCharacters> {
    SceneRepo::find_with_characters(&state.pool, movie_id, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/movies/{movie_id}/scenes
pub async fn create(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
    Json(input): Json<CreateScene>,
) -> AppResult<(StatusCode, Json<DataResponse<SceneWithCharacters>>)> {
    owned_movie(&state, &user, movie_id).await?;
    let scene = SceneRepo::create(&state.pool, movie_id, &input).await?;
    tracing::info!(scene_id = %scene.id, %movie_id, number = scene.number, "Scene created");
    let data = load(&state, movie_id, scene.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/movies/{movie_id}/scenes?page=&limit=&search=
pub async fn list(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<SceneWithCharacters>>>> {
    owned_movie(&state, &user, movie_id).await?;
    let paging = params.paging();
    let items = SceneRepo::list(
        &state.pool,
        movie_id,
        params.pattern().as_deref(),
        paging.limit,
        paging.offset,
    )
    .await?;
    tracing::debug!(%movie_id, count = items.len(), "Listed scenes");
    Ok(Json(DataResponse {
        data: Page {
            items,
            page: paging.page,
            limit: paging.limit,
        },
    }))
}

/// GET /api/v1/movies/{movie_id}/scenes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<SceneWithCharacters>>> {
    owned_movie(&state, &user, movie_id).await?;
    let data = load(&state, movie_id, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/movies/{movie_id}/scenes/{id}
///
/// Omitting `number` keeps the scene in place; an omitted `cast` clears it.
pub async fn update(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateScene>,
) -> AppResult<Json<DataResponse<SceneWithCharacters>>> {
    owned_movie(&state, &user, movie_id).await?;
    let scene = SceneRepo::update(&state.pool, movie_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(scene_id = %id, number = scene.number, "Scene updated");
    let data = load(&state, movie_id, id).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/movies/{movie_id}/scenes/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_movie(&state, &user, movie_id).await?;
    if SceneRepo::delete(&state.pool, movie_id, id).await? {
        tracing::info!(scene_id = %id, %movie_id, "Scene deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
