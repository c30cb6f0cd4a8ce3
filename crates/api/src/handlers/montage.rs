//! Handlers for montage sequences.
//!
//! Sequences are nested under scenes:
//! `/movies/{movie_id}/scenes/{scene_id}/montages[/{id}]`
//!
//! The grouped listing of montage scenes lives at `/movies/{movie_id}/montages`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use breakdown_core::error::CoreError;
use breakdown_core::types::DbId;
use breakdown_db::models::montage::{CreateMontage, Montage, MontageGroup, UpdateMontage};
use breakdown_db::repositories::MontageRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::owned_movie;
use crate::middleware::acting_user::ActingUser;
use crate::query::ListParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Montage",
        id,
    })
}

/// POST /api/v1/movies/{movie_id}/scenes/{scene_id}/montages
pub async fn create(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, scene_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateMontage>,
) -> AppResult<(StatusCode, Json<DataResponse<Montage>>)> {
    owned_movie(&state, &user, movie_id).await?;
    let montage = MontageRepo::create(&state.pool, movie_id, scene_id, &input).await?;
    tracing::info!(
        montage_id = %montage.id,
        %scene_id,
        seq_number = montage.seq_number,
        "Montage sequence created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: montage })))
}

/// GET /api/v1/movies/{movie_id}/montages?page=&limit=&search=
pub async fn list_grouped(
    State(state): State<AppState>,
    user: ActingUser,
    Path(movie_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<MontageGroup>>>> {
    owned_movie(&state, &user, movie_id).await?;
    let paging = params.paging();
    let items = MontageRepo::list_grouped(
        &state.pool,
        movie_id,
        params.pattern().as_deref(),
        paging.limit,
        paging.offset,
    )
    .await?;
    tracing::debug!(%movie_id, count = items.len(), "Listed montage scenes");
    Ok(Json(DataResponse {
        data: Page {
            items,
            page: paging.page,
            limit: paging.limit,
        },
    }))
}

/// GET /api/v1/movies/{movie_id}/scenes/{scene_id}/montages/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, scene_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<DataResponse<Montage>>> {
    owned_movie(&state, &user, movie_id).await?;
    let montage = MontageRepo::find_by_id(&state.pool, movie_id, scene_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: montage }))
}

/// PUT /api/v1/movies/{movie_id}/scenes/{scene_id}/montages/{id}
pub async fn update(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, scene_id, id)): Path<(DbId, DbId, DbId)>,
    Json(input): Json<UpdateMontage>,
) -> AppResult<Json<DataResponse<Montage>>> {
    owned_movie(&state, &user, movie_id).await?;
    let montage = MontageRepo::update(&state.pool, movie_id, scene_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(montage_id = %id, seq_number = montage.seq_number, "Montage sequence updated");
    Ok(Json(DataResponse { data: montage }))
}

/// DELETE /api/v1/movies/{movie_id}/scenes/{scene_id}/montages/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: ActingUser,
    Path((movie_id, scene_id, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_movie(&state, &user, movie_id).await?;
    if MontageRepo::delete(&state.pool, movie_id, scene_id, id).await? {
        tracing::info!(montage_id = %id, %scene_id, "Montage sequence deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
