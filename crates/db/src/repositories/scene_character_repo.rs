//! Repository for the `scene_char_map` table.
//!
//! The association set of a scene is never patched entry by entry: every
//! scene save replaces it wholesale with [`SceneCharacterRepo::replace_inner`].

use breakdown_core::error::CoreError;
use breakdown_core::mapping::CastMember;
use breakdown_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::scene_character::{CastSlot, SceneCharacterMap};

const COLUMNS: &str = "id, scene_id, char_id, type, created_at, updated_at";

/// Scene-character association operations.
pub struct SceneCharacterRepo;

impl SceneCharacterRepo {
    /// Make the scene's persisted cast exactly `cast`.
    ///
    /// Every character must belong to `movie_id`; otherwise the call fails
    /// with `InvalidMapping` before anything is deleted.
    pub async fn replace_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
        scene_id: DbId,
        cast: &[CastMember],
    ) -> StoreResult<()> {
        let char_ids: Vec<DbId> = cast.iter().map(|m| m.character_id).collect();

        if !char_ids.is_empty() {
            let known: Vec<(DbId,)> =
                sqlx::query_as("SELECT id FROM characters WHERE movie_id = $1 AND id = ANY($2)")
                    .bind(movie_id)
                    .bind(&char_ids)
                    .fetch_all(&mut **tx)
                    .await?;
            if let Some(missing) = char_ids
                .iter()
                .find(|id| !known.iter().any(|(k,)| k == *id))
            {
                return Err(CoreError::InvalidMapping(format!(
                    "Character {missing} does not belong to this movie"
                ))
                .into());
            }
        }

        sqlx::query("DELETE FROM scene_char_map WHERE scene_id = $1")
            .bind(scene_id)
            .execute(&mut **tx)
            .await?;

        if char_ids.is_empty() {
            return Ok(());
        }

        let ids: Vec<DbId> = cast.iter().map(|_| new_id()).collect();
        let roles: Vec<String> = cast.iter().map(|m| m.role.code().to_string()).collect();

        sqlx::query(
            "INSERT INTO scene_char_map (id, scene_id, char_id, type) \
             SELECT id, $2, char_id, type \
             FROM UNNEST($1::UUID[], $3::UUID[], $4::TEXT[]) AS t(id, char_id, type)",
        )
        .bind(&ids)
        .bind(scene_id)
        .bind(&char_ids)
        .bind(&roles)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// All association rows of a scene.
    ///
    /// Verification helper for tests; no handler calls it.
    pub async fn list_for_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<SceneCharacterMap>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scene_char_map WHERE scene_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, SceneCharacterMap>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }

    /// Every character of the movie with its role in `scene_id`.
    ///
    /// Characters absent from the scene (or all of them when no scene is
    /// given) carry an empty role type.
    pub async fn cast_slots(
        pool: &PgPool,
        movie_id: DbId,
        scene_id: Option<DbId>,
    ) -> Result<Vec<CastSlot>, sqlx::Error> {
        sqlx::query_as::<_, CastSlot>(
            "SELECT c.id, c.name, COALESCE(m.type, '') AS role_type \
             FROM characters c \
             LEFT JOIN scene_char_map m ON m.char_id = c.id AND m.scene_id = $2 \
             WHERE c.movie_id = $1 \
             ORDER BY c.name, c.id",
        )
        .bind(movie_id)
        .bind(scene_id)
        .fetch_all(pool)
        .await
    }
}
