//! Handlers for the `/characters` resource.
//!
//! Characters are nested under movies:
//! `/movies/{movie_id}/characters[/{id}]`
//!
//! The cast view lists every character of a movie with its role in one
//! scene: `/movies/{movie_id}/cast?scene_id=`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use breakdown_core::error::CoreError;
use breakdown_core::types::DbId;
use breakdown_db::models::character::{
    Character, CharacterWithScenes, CreateCharacter, UpdateCharacter,
};
use breakdown_db::models::scene_character::CastSlot;
use breakdown_db::repositories::{CharacterRepo, SceneCharacterRepo, SceneRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::owned_movie;
use crate::middleware::acting_user::ActingUser;
use crate::query::{CastParams, ListParams};
use crate::response::{DataResponse, Page};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Character",
        id,
    })
}

/// POST /api/v1/movies/{movie_id}/characters
pub async fn create(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<DataResponse<Character>>)> {
    owned_movie(&state, &user, movie_id).await?;
    let character = CharacterRepo::create(&state.pool, movie_id, &input).await?;
    tracing::info!(character_id = %character.id, %movie_id, "Character created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: character })))
}

/// GET /api/v1/movies/{movie_id}/characters?page=&limit=&search=
pub async fn list(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<CharacterWithScenes>>>> {
    owned_movie(&state, &user, movie_id).await?;
    let paging = params.paging();
    let items = CharacterRepo::list(
        &state.pool,
        movie_id,
        params.pattern().as_deref(),
        paging.limit,
        paging.offset,
    )
    .await?;
    tracing::debug!(%movie_id, count = items.len(), "Listed characters");
    Ok(Json(DataResponse {
        data: Page {
            items,
            page: paging.page,
            limit: paging.limit,
        },
    }))
}

/// GET /api/v1/movies/{movie_id}/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Character>>> {
    owned_movie(&state, &user, movie_id).await?;
    let character = CharacterRepo::find_by_id(&state.pool, movie_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: character }))
}

/// PUT /api/v1/movies/{movie_id}/characters/{id}
pub async fn update(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<Json<DataResponse<Character>>> {
    owned_movie(&state, &user, movie_id).await?;
    let character = CharacterRepo::update(&state.pool, movie_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(character_id = %id, "Character updated");
    Ok(Json(DataResponse { data: character }))
}

/// DELETE /api/v1/movies/{movie_id}/characters/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_movie(&state, &user, movie_id).await?;
    if CharacterRepo::delete(&state.pool, movie_id, id).await? {
        tracing::info!(character_id = %id, "Character deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/movies/{movie_id}/cast?scene_id=
///
/// Every character of the movie with its role in `scene_id`; roles are
/// empty when no scene is given.
pub async fn cast(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
    Query(params): Query<CastParams>,
) -> AppResult<Json<DataResponse<Vec<CastSlot>>>> {
    owned_movie(&state, &user, movie_id).await?;
    if let Some(scene_id) = params.scene_id {
        SceneRepo::find_by_id(&state.pool, movie_id, scene_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Scene",
                id: scene_id,
            }))?;
    }
    let slots = SceneCharacterRepo::cast_slots(&state.pool, movie_id, params.scene_id).await?;
    Ok(Json(DataResponse { data: slots }))
}
