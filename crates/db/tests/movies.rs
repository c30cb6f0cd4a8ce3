//! Integration tests for movies: default-movie selection and cascade delete.

use assert_matches::assert_matches;
use breakdown_core::error::CoreError;
use breakdown_core::mapping::CastEntry;
use breakdown_core::types::DbId;
use breakdown_db::models::character::CreateCharacter;
use breakdown_db::models::montage::{CreateMontage, MontageDetails};
use breakdown_db::models::movie::CreateMovie;
use breakdown_db::models::scene::{CreateScene, SceneDetails};
use breakdown_db::repositories::{
    CharacterRepo, MontageRepo, MovieRepo, SceneRepo, UserRepo,
};
use breakdown_db::StoreError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user_id(pool: &PgPool) -> DbId {
    UserRepo::find_by_email(pool, "default.user@email.com")
        .await
        .unwrap()
        .expect("default user is seeded")
        .id
}

fn new_movie(name: &str) -> CreateMovie {
    CreateMovie {
        name: name.to_string(),
        logline: Some(format!("{name} logline")),
        description: None,
    }
}

async fn default_count(pool: &PgPool, user_id: DbId) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM movies WHERE user_id = $1 AND default_flag = 'Y'")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();
    count
}

// ---------------------------------------------------------------------------
// Test: default movie
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_movies_means_no_default(pool: PgPool) {
    let user_id = user_id(&pool).await;
    let err = MovieRepo::find_default(&pool, user_id).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NoDefaultMovie));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_edit_and_select_swap_default(pool: PgPool) {
    let user_id = user_id(&pool).await;

    let first = MovieRepo::create(&pool, user_id, &new_movie("First")).await.unwrap();
    assert!(first.is_default());

    let second = MovieRepo::create(&pool, user_id, &new_movie("Second")).await.unwrap();
    assert!(second.is_default());
    assert_eq!(MovieRepo::find_default(&pool, user_id).await.unwrap().id, second.id);
    assert_eq!(default_count(&pool, user_id).await, 1);

    let selected = MovieRepo::set_default(&pool, user_id, first.id)
        .await
        .unwrap()
        .expect("movie exists");
    assert!(selected.is_default());
    assert_eq!(MovieRepo::find_default(&pool, user_id).await.unwrap().id, first.id);
    assert_eq!(default_count(&pool, user_id).await, 1);

    let edited = MovieRepo::update(&pool, user_id, second.id, &new_movie("Second Cut"))
        .await
        .unwrap()
        .expect("movie exists");
    assert_eq!(edited.name, "Second Cut");
    assert!(edited.is_default());
    assert_eq!(default_count(&pool, user_id).await, 1);

    let choices = MovieRepo::list_choices(&pool, user_id).await.unwrap();
    assert_eq!(choices.len(), 2);
    assert_eq!(choices.iter().filter(|c| c.default_flag == "Y").count(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_name_is_rejected(pool: PgPool) {
    let user_id = user_id(&pool).await;
    let err = MovieRepo::create(&pool, user_id, &new_movie("  ")).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));
    assert!(MovieRepo::list_choices(&pool, user_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_select_unknown_movie_returns_none(pool: PgPool) {
    let user_id = user_id(&pool).await;
    let result = MovieRepo::set_default(&pool, user_id, breakdown_core::types::new_id())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: cascade delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_removes_every_dependent(pool: PgPool) {
    let user_id = user_id(&pool).await;
    let keep = MovieRepo::create(&pool, user_id, &new_movie("Keep")).await.unwrap();
    let doomed = MovieRepo::create(&pool, user_id, &new_movie("Doomed")).await.unwrap();

    let hero = CharacterRepo::create(
        &pool,
        doomed.id,
        &CreateCharacter {
            name: "Hero".to_string(),
            gender: "O".to_string(),
            lower_age: Some(30),
            upper_age: Some(40),
            character_type: "M".to_string(),
            description: None,
            exp_screen_time: None,
            notes: None,
        },
    )
    .await
    .unwrap();

    let scene = SceneRepo::create(
        &pool,
        doomed.id,
        &CreateScene {
            number: 1,
            details: SceneDetails {
                ie_flag: "E".to_string(),
                sl_flag: "L".to_string(),
                scene_type: "M".to_string(),
                ..Default::default()
            },
            cast: vec![CastEntry {
                character_id: hero.id.to_string(),
                role_type: Some("D".to_string()),
            }],
        },
    )
    .await
    .unwrap();

    MontageRepo::create(
        &pool,
        doomed.id,
        scene.id,
        &CreateMontage {
            seq_number: 1,
            details: MontageDetails {
                ie_flag: "E".to_string(),
                sl_flag: "L".to_string(),
                ..Default::default()
            },
        },
    )
    .await
    .unwrap();

    assert!(MovieRepo::delete(&pool, user_id, doomed.id).await.unwrap());

    for (table, column) in [
        ("montages", "scene_id"),
        ("scene_char_map", "scene_id"),
    ] {
        let (count,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1"))
                .bind(scene.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0, "{table} rows should be gone");
    }
    for table in ["characters", "scenes"] {
        let (count,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE movie_id = $1"))
                .bind(doomed.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0, "{table} rows should be gone");
    }

    // The surviving movie is promoted to default.
    assert_eq!(MovieRepo::find_default(&pool, user_id).await.unwrap().id, keep.id);
    assert_eq!(default_count(&pool, user_id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_promotes_newest_remaining(pool: PgPool) {
    let user_id = user_id(&pool).await;
    let oldest = MovieRepo::create(&pool, user_id, &new_movie("Oldest")).await.unwrap();
    let middle = MovieRepo::create(&pool, user_id, &new_movie("Middle")).await.unwrap();
    MovieRepo::create(&pool, user_id, &new_movie("Newest")).await.unwrap();
    let newest_id = MovieRepo::find_default(&pool, user_id).await.unwrap().id;

    MovieRepo::set_default(&pool, user_id, oldest.id).await.unwrap();
    assert!(MovieRepo::delete(&pool, user_id, oldest.id).await.unwrap());
    assert_eq!(MovieRepo::find_default(&pool, user_id).await.unwrap().id, newest_id);

    // Deleting a non-default movie leaves the default alone.
    assert!(MovieRepo::delete(&pool, user_id, middle.id).await.unwrap());
    assert_eq!(MovieRepo::find_default(&pool, user_id).await.unwrap().id, newest_id);

    assert!(MovieRepo::delete(&pool, user_id, newest_id).await.unwrap());
    assert_matches!(
        MovieRepo::find_default(&pool, user_id).await,
        Err(StoreError::Core(CoreError::NoDefaultMovie))
    );
}

// ---------------------------------------------------------------------------
// Test: listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_includes_main_cast_and_scene_count(pool: PgPool) {
    let user_id = user_id(&pool).await;
    let movie = MovieRepo::create(&pool, user_id, &new_movie("Night Train")).await.unwrap();
    MovieRepo::create(&pool, user_id, &new_movie("Day Boat")).await.unwrap();

    for (name, kind) in [("Vera", "M"), ("Otto", "S"), ("Ada", "M")] {
        CharacterRepo::create(
            &pool,
            movie.id,
            &CreateCharacter {
                name: name.to_string(),
                gender: "F".to_string(),
                lower_age: None,
                upper_age: None,
                character_type: kind.to_string(),
                description: None,
                exp_screen_time: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    }
    SceneRepo::create(
        &pool,
        movie.id,
        &CreateScene {
            number: 1,
            details: SceneDetails {
                ie_flag: "I".to_string(),
                sl_flag: "S".to_string(),
                scene_type: "D".to_string(),
                ..Default::default()
            },
            cast: vec![],
        },
    )
    .await
    .unwrap();

    let listed = MovieRepo::list(&pool, user_id, Some("%train%"), 5, 0).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].main_characters, ["Ada", "Vera"]);
    assert_eq!(listed[0].scene_count, 1);

    let all = MovieRepo::list(&pool, user_id, None, 5, 0).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Day Boat");
}
