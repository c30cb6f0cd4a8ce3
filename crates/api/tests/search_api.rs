//! HTTP-level tests for the advanced search and the dashboard.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_character, create_movie, get, post_json, scene_body};
use sqlx::PgPool;

async fn search(pool: &PgPool, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/search", body).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn movie_search_matches_name_case_insensitively(pool: PgPool) {
    create_movie(&pool, "Drama Queen").await;
    create_movie(&pool, "Comedy Hour").await;

    let (status, json) = search(
        &pool,
        serde_json::json!({
            "entity": "Movies",
            "filters": [{ "field": "Name", "value": "dRaMa" }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["entity"], "Movies");
    let results = json["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Drama Queen");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_filters_return_everything_paged(pool: PgPool) {
    for name in ["One", "Two", "Three"] {
        create_movie(&pool, name).await;
    }

    let (status, json) = search(
        &pool,
        serde_json::json!({ "entity": "Movies", "filters": [], "limit": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["results"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["limit"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scene_search_by_character_name(pool: PgPool) {
    let movie = create_movie(&pool, "Heist").await;
    let maya = create_character(&pool, &movie, "Maya", "M").await;

    let mut with_maya = scene_body(1, "vault");
    with_maya["cast"] = serde_json::json!([{ "character_id": maya, "role_type": "D" }]);
    for body in [with_maya, scene_body(2, "getaway")] {
        let response = post_json(
            build_test_app(pool.clone()),
            &format!("/api/v1/movies/{movie}/scenes"),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let (status, json) = search(
        &pool,
        serde_json::json!({
            "entity": "Scenes",
            "filters": [{ "field": "Character", "value": "maya" }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = json["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["description"], "vault");
    assert_eq!(results[0]["movie_name"], "Heist");
    assert_eq!(results[0]["characters"][0]["name"], "Maya");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_field_returns_400(pool: PgPool) {
    let (status, json) = search(
        &pool,
        serde_json::json!({
            "entity": "Montages",
            "filters": [{ "field": "Character", "value": "Maya" }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_groups_cast_and_counts_scenes(pool: PgPool) {
    let movie = create_movie(&pool, "Overview").await;
    create_character(&pool, &movie, "Lead", "M").await;
    create_character(&pool, &movie, "Sidekick", "P").await;

    let mut long_scene = scene_body(1, "chase");
    long_scene["type"] = serde_json::json!("A");
    long_scene["sl_flag"] = serde_json::json!("L");
    long_scene["exp_length"] = serde_json::json!(9);
    for body in [long_scene, scene_body(2, "talk")] {
        post_json(
            build_test_app(pool.clone()),
            &format!("/api/v1/movies/{movie}/scenes"),
            body,
        )
        .await;
    }

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/movies/{movie}/dashboard"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["movie"]["name"], "Overview");
    assert_eq!(data["characters"]["main"], serde_json::json!(["Lead"]));
    assert_eq!(data["characters"]["primary"], serde_json::json!(["Sidekick"]));
    assert_eq!(data["scenes"]["total"], 2);
    assert_eq!(data["scenes"]["location"], 1);
    assert_eq!(data["scenes"]["set"], 1);
    assert_eq!(data["scenes"]["action"], 1);
    assert_eq!(data["scenes"]["dialogue"], 1);
    assert_eq!(data["longest_scenes"][0]["description"], "chase");
}
