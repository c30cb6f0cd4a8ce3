//! Route definitions for the `/movies` resource.
//!
//! Everything belonging to a movie is nested under `/movies/{movie_id}/...`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{character, dashboard, montage, movie, scene};
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET    /                                          -> list
/// POST   /                                          -> create
/// GET    /picker                                    -> picker
/// GET    /default                                   -> get_default
/// GET    /{movie_id}                                -> get_by_id
/// PUT    /{movie_id}                                -> update
/// DELETE /{movie_id}                                -> delete
/// PUT    /{movie_id}/default                        -> select_default
/// GET    /{movie_id}/dashboard                      -> dashboard::get
///
/// GET    /{movie_id}/characters                     -> list
/// POST   /{movie_id}/characters                     -> create
/// GET    /{movie_id}/characters/{id}                -> get_by_id
/// PUT    /{movie_id}/characters/{id}                -> update
/// DELETE /{movie_id}/characters/{id}                -> delete
/// GET    /{movie_id}/cast                           -> character::cast
///
/// GET    /{movie_id}/scenes                         -> list
/// POST   /{movie_id}/scenes                         -> create
/// GET    /{movie_id}/scenes/{scene_id}              -> get_by_id
/// PUT    /{movie_id}/scenes/{scene_id}              -> update
/// DELETE /{movie_id}/scenes/{scene_id}              -> delete
///
/// GET    /{movie_id}/montages                       -> list_grouped
/// POST   /{movie_id}/scenes/{scene_id}/montages     -> create
/// GET    /{movie_id}/scenes/{scene_id}/montages/{id} -> get_by_id
/// PUT    /{movie_id}/scenes/{scene_id}/montages/{id} -> update
/// DELETE /{movie_id}/scenes/{scene_id}/montages/{id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    let character_routes = Router::new()
        .route("/", get(character::list).post(character::create))
        .route(
            "/{id}",
            get(character::get_by_id)
                .put(character::update)
                .delete(character::delete),
        );

    let montage_routes = Router::new()
        .route("/", axum::routing::post(montage::create))
        .route(
            "/{id}",
            get(montage::get_by_id)
                .put(montage::update)
                .delete(montage::delete),
        );

    let scene_routes = Router::new()
        .route("/", get(scene::list).post(scene::create))
        .route(
            "/{scene_id}",
            get(scene::get_by_id)
                .put(scene::update)
                .delete(scene::delete),
        )
        .nest("/{scene_id}/montages", montage_routes);

    Router::new()
        .route("/", get(movie::list).post(movie::create))
        .route("/picker", get(movie::picker))
        .route("/default", get(movie::get_default))
        .route(
            "/{movie_id}",
            get(movie::get_by_id)
                .put(movie::update)
                .delete(movie::delete),
        )
        .route("/{movie_id}/default", put(movie::select_default))
        .route("/{movie_id}/dashboard", get(dashboard::get))
        .route("/{movie_id}/cast", get(character::cast))
        .route("/{movie_id}/montages", get(montage::list_grouped))
        .nest("/{movie_id}/characters", character_routes)
        .nest("/{movie_id}/scenes", scene_routes)
}
