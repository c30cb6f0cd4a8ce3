//! Repository for the `scenes` table.
//!
//! Scene numbers within a movie stay exactly `1..=N`. Every write locks the
//! movie row, renumbers the siblings, writes the scene, and reconciles its
//! cast in one transaction.

use std::collections::HashMap;

use breakdown_core::error::CoreError;
use breakdown_core::mapping::validate_cast;
use breakdown_core::ordering::{plan_insert, plan_move, plan_removal};
use breakdown_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::scene::{
    CreateScene, Scene, SceneCastMember, SceneDetails, SceneWithCharacters, UpdateScene,
    SCENE_COLUMNS as COLUMNS,
};
use crate::repositories::ordering_repo::{OrderingRepo, SiblingSet};
use crate::repositories::{prefixed, SceneCharacterRepo};

/// Scene operations, scoped to one movie.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a scene at `input.number`, shifting later scenes down, and
    /// write its cast.
    ///
    /// Fails with `OutOfRange` if the number would leave a gap.
    pub async fn create(pool: &PgPool, movie_id: DbId, input: &CreateScene) -> StoreResult<Scene> {
        let details = input.details.validated()?;
        let cast = validate_cast(&input.cast)?;
        let set = SiblingSet::ScenesOfMovie(movie_id);

        let mut tx = pool.begin().await?;

        if !OrderingRepo::lock_parent(&mut tx, set).await? {
            return Err(CoreError::NotFound {
                entity: "Movie",
                id: movie_id,
            }
            .into());
        }
        let max = OrderingRepo::max_position(&mut tx, set).await?;
        if let Some(shift) = plan_insert(set.label(), input.number, max)? {
            OrderingRepo::apply_shift(&mut tx, set, shift, None).await?;
        }

        let query = format!(
            "INSERT INTO scenes \
                (id, movie_id, number, act, ie_flag, sl_flag, type, location, sub_location, \
                 weather, time, description, exp_length, num_extras, camera_notes, \
                 lighting_notes, sound_notes, color_notes, prop_notes, other_notes, \
                 relevance_quotient, cost_quotient) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                     $16, $17, $18, $19, $20, $21, $22) \
             RETURNING {COLUMNS}"
        );
        let scene = bind_details(
            sqlx::query_as::<_, Scene>(&query)
                .bind(new_id())
                .bind(movie_id)
                .bind(input.number),
            &details,
        )
        .fetch_one(&mut *tx)
        .await?;

        SceneCharacterRepo::replace_inner(&mut tx, movie_id, scene.id, &cast).await?;

        tx.commit().await?;
        Ok(scene)
    }

    /// Find a scene of `movie_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        movie_id: DbId,
        id: DbId,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1 AND movie_id = $2");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(movie_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a scene of `movie_id` together with its cast.
    pub async fn find_with_characters(
        pool: &PgPool,
        movie_id: DbId,
        id: DbId,
    ) -> Result<Option<SceneWithCharacters>, sqlx::Error> {
        let Some(scene) = Self::find_by_id(pool, movie_id, id).await? else {
            return Ok(None);
        };
        let mut cast = Self::cast_members(pool, &[scene.id]).await?;
        let characters = cast.remove(&scene.id).unwrap_or_default();
        Ok(Some(SceneWithCharacters { scene, characters }))
    }

    /// Replace a scene's details and cast, moving it to `input.number` if
    /// given.
    ///
    /// Returns `None` if `movie_id` has no scene with this `id`. Fails with
    /// `OutOfRange` if the new number exceeds the current maximum.
    pub async fn update(
        pool: &PgPool,
        movie_id: DbId,
        id: DbId,
        input: &UpdateScene,
    ) -> StoreResult<Option<Scene>> {
        let details = input.details.validated()?;
        let cast = validate_cast(&input.cast)?;
        let set = SiblingSet::ScenesOfMovie(movie_id);

        let mut tx = pool.begin().await?;

        if !OrderingRepo::lock_parent(&mut tx, set).await? {
            return Ok(None);
        }
        let current: Option<(i32,)> =
            sqlx::query_as("SELECT number FROM scenes WHERE id = $1 AND movie_id = $2")
                .bind(id)
                .bind(movie_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((old_number,)) = current else {
            return Ok(None);
        };

        let new_number = input.number.unwrap_or(old_number);
        let max = OrderingRepo::max_position(&mut tx, set).await?;
        if let Some(shift) = plan_move(set.label(), old_number, new_number, max)? {
            OrderingRepo::apply_shift(&mut tx, set, shift, Some(id)).await?;
        }

        let query = format!(
            "UPDATE scenes SET \
                number = $3, act = $4, ie_flag = $5, sl_flag = $6, type = $7, location = $8, \
                sub_location = $9, weather = $10, time = $11, description = $12, \
                exp_length = $13, num_extras = $14, camera_notes = $15, lighting_notes = $16, \
                sound_notes = $17, color_notes = $18, prop_notes = $19, other_notes = $20, \
                relevance_quotient = $21, cost_quotient = $22 \
             WHERE id = $1 AND movie_id = $2 \
             RETURNING {COLUMNS}"
        );
        let scene = bind_details(
            sqlx::query_as::<_, Scene>(&query)
                .bind(id)
                .bind(movie_id)
                .bind(new_number),
            &details,
        )
        .fetch_one(&mut *tx)
        .await?;

        SceneCharacterRepo::replace_inner(&mut tx, movie_id, id, &cast).await?;

        tx.commit().await?;
        Ok(Some(scene))
    }

    /// Delete a scene with its cast rows and montage sequences, then close
    /// the gap in the movie's numbering.
    ///
    /// Returns `false` if `movie_id` has no scene with this `id`.
    pub async fn delete(pool: &PgPool, movie_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let set = SiblingSet::ScenesOfMovie(movie_id);
        let mut tx = pool.begin().await?;

        if !OrderingRepo::lock_parent(&mut tx, set).await? {
            return Ok(false);
        }
        let current: Option<(i32,)> =
            sqlx::query_as("SELECT number FROM scenes WHERE id = $1 AND movie_id = $2")
                .bind(id)
                .bind(movie_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((number,)) = current else {
            return Ok(false);
        };
        // Wait out in-flight montage writes so none lands after the cleanup.
        OrderingRepo::lock_parent(&mut tx, SiblingSet::MontagesOfScene(id)).await?;

        sqlx::query("DELETE FROM scene_char_map WHERE scene_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM montages WHERE scene_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let renumbered = OrderingRepo::apply_shift(&mut tx, set, plan_removal(number), None).await?;

        tx.commit().await?;
        tracing::debug!(scene_id = %id, number, renumbered, "Scene deleted");
        Ok(true)
    }

    /// One page of a movie's scenes in number order, each with its cast.
    ///
    /// `pattern` is an `ILIKE` pattern matched against the number (as text),
    /// location, sub-location, description, and every notes column.
    pub async fn list(
        pool: &PgPool,
        movie_id: DbId,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SceneWithCharacters>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM scenes s \
             WHERE s.movie_id = $1 \
               AND ($2::TEXT IS NULL \
                    OR s.number::TEXT ILIKE $2 OR s.location ILIKE $2 \
                    OR s.sub_location ILIKE $2 OR s.description ILIKE $2 \
                    OR s.camera_notes ILIKE $2 OR s.lighting_notes ILIKE $2 \
                    OR s.sound_notes ILIKE $2 OR s.color_notes ILIKE $2 \
                    OR s.prop_notes ILIKE $2 OR s.other_notes ILIKE $2) \
             ORDER BY s.number \
             LIMIT $3 OFFSET $4",
            cols = prefixed(COLUMNS, "s"),
        );
        let scenes = sqlx::query_as::<_, Scene>(&query)
            .bind(movie_id)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = scenes.iter().map(|s| s.id).collect();
        let mut cast = Self::cast_members(pool, &ids).await?;

        Ok(scenes
            .into_iter()
            .map(|scene| {
                let characters = cast.remove(&scene.id).unwrap_or_default();
                SceneWithCharacters { scene, characters }
            })
            .collect())
    }

    /// Characters featured in each of `scene_ids`, with their role type.
    pub async fn cast_members(
        pool: &PgPool,
        scene_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<SceneCastMember>>, sqlx::Error> {
        if scene_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, SceneCastMember>(
            "SELECT m.scene_id, c.id, c.name, c.description, m.type AS role_type \
             FROM scene_char_map m \
             JOIN characters c ON c.id = m.char_id \
             WHERE m.scene_id = ANY($1) \
             ORDER BY c.name, c.id",
        )
        .bind(scene_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<DbId, Vec<SceneCastMember>> = HashMap::new();
        for row in rows {
            grouped.entry(row.scene_id).or_default().push(row);
        }
        Ok(grouped)
    }
}

type SceneQuery<'q> =
    sqlx::query::QueryAs<'q, sqlx::Postgres, Scene, sqlx::postgres::PgArguments>;

/// Bind the 19 detail columns following the id/movie/number parameters.
fn bind_details<'q>(query: SceneQuery<'q>, d: &'q SceneDetails) -> SceneQuery<'q> {
    query
        .bind(&d.act)
        .bind(&d.ie_flag)
        .bind(&d.sl_flag)
        .bind(&d.scene_type)
        .bind(&d.location)
        .bind(&d.sub_location)
        .bind(&d.weather)
        .bind(&d.time)
        .bind(&d.description)
        .bind(d.exp_length)
        .bind(d.num_extras)
        .bind(&d.camera_notes)
        .bind(&d.lighting_notes)
        .bind(&d.sound_notes)
        .bind(&d.color_notes)
        .bind(&d.prop_notes)
        .bind(&d.other_notes)
        .bind(&d.relevance_quotient)
        .bind(&d.cost_quotient)
}
