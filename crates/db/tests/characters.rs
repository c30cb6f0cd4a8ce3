//! Integration tests for characters and scene cast reconciliation.

use assert_matches::assert_matches;
use breakdown_core::error::CoreError;
use breakdown_core::mapping::CastEntry;
use breakdown_core::types::DbId;
use breakdown_db::models::character::CreateCharacter;
use breakdown_db::models::movie::CreateMovie;
use breakdown_db::models::scene::{CreateScene, SceneDetails, UpdateScene};
use breakdown_db::repositories::{
    CharacterRepo, MovieRepo, SceneCharacterRepo, SceneRepo, UserRepo,
};
use breakdown_db::StoreError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_movie(pool: &PgPool, name: &str) -> DbId {
    let user = UserRepo::find_by_email(pool, "default.user@email.com")
        .await
        .unwrap()
        .expect("default user is seeded");
    MovieRepo::create(
        pool,
        user.id,
        &CreateMovie {
            name: name.to_string(),
            logline: None,
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_character(name: &str, kind: &str, lower: Option<i32>, upper: Option<i32>) -> CreateCharacter {
    CreateCharacter {
        name: name.to_string(),
        gender: "M".to_string(),
        lower_age: lower,
        upper_age: upper,
        character_type: kind.to_string(),
        description: None,
        exp_screen_time: Some(12),
        notes: None,
    }
}

fn details() -> SceneDetails {
    SceneDetails {
        ie_flag: "I".to_string(),
        sl_flag: "S".to_string(),
        scene_type: "D".to_string(),
        ..Default::default()
    }
}

fn entry(id: DbId, role: &str) -> CastEntry {
    CastEntry {
        character_id: id.to_string(),
        role_type: Some(role.to_string()),
    }
}

/// (character name, role) pairs persisted for a scene.
async fn cast_of(pool: &PgPool, movie_id: DbId, scene_id: DbId) -> Vec<(String, String)> {
    SceneRepo::find_with_characters(pool, movie_id, scene_id)
        .await
        .unwrap()
        .expect("scene exists")
        .characters
        .into_iter()
        .map(|c| (c.name, c.role_type))
        .collect()
}

// ---------------------------------------------------------------------------
// Test: character validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_age_range_boundaries(pool: PgPool) {
    let movie_id = new_movie(&pool, "Ages").await;

    let elder = CharacterRepo::create(&pool, movie_id, &new_character("Elder", "S", Some(125), Some(125)))
        .await
        .unwrap();
    assert_eq!(elder.upper_age, Some(125));

    let err = CharacterRepo::create(&pool, movie_id, &new_character("Too Old", "S", Some(20), Some(126)))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));

    let err = CharacterRepo::create(&pool, movie_id, &new_character("Inverted", "S", Some(10), Some(5)))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));

    let err = CharacterRepo::update(
        &pool,
        movie_id,
        elder.id,
        &new_character("Elder", "S", Some(10), Some(5)),
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_ranks_by_type_then_name(pool: PgPool) {
    let movie_id = new_movie(&pool, "Ranks").await;
    for (name, kind) in [("Zed", "O"), ("Bob", "M"), ("Amy", "P"), ("Cal", "M"), ("Dee", "T")] {
        CharacterRepo::create(&pool, movie_id, &new_character(name, kind, None, None))
            .await
            .unwrap();
    }

    let names: Vec<String> = CharacterRepo::list(&pool, movie_id, None, 10, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.character.name)
        .collect();
    assert_eq!(names, ["Bob", "Cal", "Amy", "Dee", "Zed"]);

    let page_two = CharacterRepo::list(&pool, movie_id, None, 2, 2).await.unwrap();
    assert_eq!(page_two[0].character.name, "Amy");

    let matched = CharacterRepo::list(&pool, movie_id, Some("%ee%"), 10, 0).await.unwrap();
    assert_eq!(matched.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: cast reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cast_replace_is_idempotent(pool: PgPool) {
    let movie_id = new_movie(&pool, "Cast").await;
    let ana = CharacterRepo::create(&pool, movie_id, &new_character("Ana", "M", None, None))
        .await
        .unwrap();
    let ben = CharacterRepo::create(&pool, movie_id, &new_character("Ben", "P", None, None))
        .await
        .unwrap();

    let cast = vec![entry(ana.id, "D"), entry(ben.id, "")];
    let scene = SceneRepo::create(
        &pool,
        movie_id,
        &CreateScene {
            number: 1,
            details: details(),
            cast: cast.clone(),
        },
    )
    .await
    .unwrap();
    assert_eq!(cast_of(&pool, movie_id, scene.id).await, [("Ana".to_string(), "D".to_string())]);

    for _ in 0..2 {
        SceneRepo::update(
            &pool,
            movie_id,
            scene.id,
            &UpdateScene {
                number: None,
                details: details(),
                cast: cast.clone(),
            },
        )
        .await
        .unwrap();
    }
    let rows = SceneCharacterRepo::list_for_scene(&pool, scene.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].char_id, ana.id);

    // Cast view lists every character, with an empty role when absent.
    let slots = SceneCharacterRepo::cast_slots(&pool, movie_id, Some(scene.id))
        .await
        .unwrap();
    let view: Vec<(String, String)> = slots.into_iter().map(|s| (s.name, s.role_type)).collect();
    assert_eq!(
        view,
        [
            ("Ana".to_string(), "D".to_string()),
            ("Ben".to_string(), String::new())
        ]
    );

    // Replacing with a different set swaps the rows.
    SceneRepo::update(
        &pool,
        movie_id,
        scene.id,
        &UpdateScene {
            number: None,
            details: details(),
            cast: vec![entry(ben.id, "B")],
        },
    )
    .await
    .unwrap();
    assert_eq!(cast_of(&pool, movie_id, scene.id).await, [("Ben".to_string(), "B".to_string())]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_cast_leaves_mapping_untouched(pool: PgPool) {
    let movie_id = new_movie(&pool, "Strict").await;
    let other_movie = new_movie(&pool, "Elsewhere").await;
    let ana = CharacterRepo::create(&pool, movie_id, &new_character("Ana", "M", None, None))
        .await
        .unwrap();
    let stranger = CharacterRepo::create(&pool, other_movie, &new_character("Stranger", "M", None, None))
        .await
        .unwrap();

    let scene = SceneRepo::create(
        &pool,
        movie_id,
        &CreateScene {
            number: 1,
            details: details(),
            cast: vec![entry(ana.id, "D")],
        },
    )
    .await
    .unwrap();

    for bad in [
        vec![entry(ana.id, "X")],
        vec![entry(stranger.id, "D")],
        vec![entry(ana.id, "D"), entry(ana.id, "N")],
    ] {
        let err = SceneRepo::update(
            &pool,
            movie_id,
            scene.id,
            &UpdateScene {
                number: None,
                details: details(),
                cast: bad,
            },
        )
        .await
        .unwrap_err();
        assert_matches!(err, StoreError::Core(CoreError::InvalidMapping(_)));
    }

    assert_eq!(cast_of(&pool, movie_id, scene.id).await, [("Ana".to_string(), "D".to_string())]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_character_delete_drops_its_mappings(pool: PgPool) {
    let movie_id = new_movie(&pool, "Exit").await;
    let ana = CharacterRepo::create(&pool, movie_id, &new_character("Ana", "M", None, None))
        .await
        .unwrap();
    let scene = SceneRepo::create(
        &pool,
        movie_id,
        &CreateScene {
            number: 1,
            details: details(),
            cast: vec![entry(ana.id, "O")],
        },
    )
    .await
    .unwrap();

    let listed = CharacterRepo::list(&pool, movie_id, None, 5, 0).await.unwrap();
    assert_eq!(listed[0].scenes.len(), 1);
    assert_eq!(listed[0].scenes[0].scene_id, scene.id);

    assert!(CharacterRepo::delete(&pool, movie_id, ana.id).await.unwrap());
    assert!(cast_of(&pool, movie_id, scene.id).await.is_empty());
    assert!(!CharacterRepo::delete(&pool, movie_id, ana.id).await.unwrap());
}
