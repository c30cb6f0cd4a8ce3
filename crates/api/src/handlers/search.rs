//! Handler for the advanced search screen.

use axum::extract::State;
use axum::Json;
use breakdown_core::search::{build_criteria, FieldFilter, SearchEntity};
use breakdown_db::models::search::SearchResults;
use breakdown_db::repositories::SearchRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::acting_user::ActingUser;
use crate::query::paging;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub entity: SearchEntity,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// One page of hits for one entity family.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    #[serde(flatten)]
    pub results: SearchResults,
    pub page: i64,
    pub limit: i64,
}

/// POST /api/v1/search
pub async fn search(
    State(state): State<AppState>,
    user: ActingUser,
    Json(input): Json<SearchRequest>,
) -> AppResult<Json<DataResponse<SearchPage>>> {
    let criteria = build_criteria(input.entity, &input.filters)?;
    let paging = paging(input.page, input.limit);
    let results = SearchRepo::search(
        &state.pool,
        user.user_id,
        &criteria,
        paging.limit,
        paging.offset,
    )
    .await?;
    Ok(Json(DataResponse {
        data: SearchPage {
            results,
            page: paging.page,
            limit: paging.limit,
        },
    }))
}
