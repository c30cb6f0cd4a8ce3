pub mod health;
pub mod movie;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /me                                              acting user (GET)
///
/// /movies                                          list, create
/// /movies/picker                                   id/name pairs for the switcher
/// /movies/default                                  the acting user's default movie
/// /movies/{movie_id}                               get, update, delete
/// /movies/{movie_id}/default                       make default (PUT)
/// /movies/{movie_id}/dashboard                     aggregated overview
/// /movies/{movie_id}/cast                          cast slots, optionally for a scene
/// /movies/{movie_id}/montages                      montage scenes with their sequences
/// /movies/{movie_id}/characters                    list, create
/// /movies/{movie_id}/characters/{id}               get, update, delete
/// /movies/{movie_id}/scenes                        list, create
/// /movies/{movie_id}/scenes/{scene_id}             get, update, delete
/// /movies/{movie_id}/scenes/{scene_id}/montages    create
/// /movies/{movie_id}/scenes/{scene_id}/montages/{id}  get, update, delete
///
/// /search                                          advanced search (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me::get))
        .nest("/movies", movie::router())
        .route("/search", post(handlers::search::search))
}
