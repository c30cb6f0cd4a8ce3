//! Repository for the `montages` table.
//!
//! Sequence numbers within a scene stay exactly `1..=N`, maintained the same
//! way as scene numbers but with the scene row as the lock parent.

use breakdown_core::error::CoreError;
use breakdown_core::ordering::{plan_insert, plan_move, plan_removal};
use breakdown_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::montage::{
    CreateMontage, Montage, MontageDetails, MontageGroup, MontageSceneHeader, UpdateMontage,
};
use crate::repositories::ordering_repo::{OrderingRepo, SiblingSet};
use crate::repositories::prefixed;

/// Column list for the `montages` table.
pub(crate) const COLUMNS: &str = "id, scene_id, seq_number, ie_flag, sl_flag, location, \
    sub_location, weather, time, description, exp_length, num_extras, notes, \
    created_at, updated_at";

/// Montage sequence operations, scoped to one scene of one movie.
pub struct MontageRepo;

impl MontageRepo {
    /// Insert a sequence at `input.seq_number`, shifting later sequences down.
    pub async fn create(
        pool: &PgPool,
        movie_id: DbId,
        scene_id: DbId,
        input: &CreateMontage,
    ) -> StoreResult<Montage> {
        let details = input.details.validated()?;
        let set = SiblingSet::MontagesOfScene(scene_id);

        let mut tx = pool.begin().await?;

        if !Self::lock_scene_inner(&mut tx, movie_id, scene_id).await? {
            return Err(CoreError::NotFound {
                entity: "Scene",
                id: scene_id,
            }
            .into());
        }
        let max = OrderingRepo::max_position(&mut tx, set).await?;
        if let Some(shift) = plan_insert(set.label(), input.seq_number, max)? {
            OrderingRepo::apply_shift(&mut tx, set, shift, None).await?;
        }

        let query = format!(
            "INSERT INTO montages \
                (id, scene_id, seq_number, ie_flag, sl_flag, location, sub_location, \
                 weather, time, description, exp_length, num_extras, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        let montage = bind_details(
            sqlx::query_as::<_, Montage>(&query)
                .bind(new_id())
                .bind(scene_id)
                .bind(input.seq_number),
            &details,
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(montage)
    }

    /// Find a sequence of `scene_id`, provided the scene belongs to `movie_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        movie_id: DbId,
        scene_id: DbId,
        id: DbId,
    ) -> Result<Option<Montage>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM montages t \
             JOIN scenes s ON s.id = t.scene_id \
             WHERE t.id = $1 AND t.scene_id = $2 AND s.movie_id = $3",
            cols = prefixed(COLUMNS, "t"),
        );
        sqlx::query_as::<_, Montage>(&query)
            .bind(id)
            .bind(scene_id)
            .bind(movie_id)
            .fetch_optional(pool)
            .await
    }

    /// Sequences of one scene in order.
    ///
    /// Verification helper for tests; no handler calls it.
    pub async fn list_for_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<Montage>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM montages WHERE scene_id = $1 ORDER BY seq_number");
        sqlx::query_as::<_, Montage>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a sequence's fields, moving it to `input.seq_number` if given.
    ///
    /// Returns `None` if the scene has no sequence with this `id`.
    pub async fn update(
        pool: &PgPool,
        movie_id: DbId,
        scene_id: DbId,
        id: DbId,
        input: &UpdateMontage,
    ) -> StoreResult<Option<Montage>> {
        let details = input.details.validated()?;
        let set = SiblingSet::MontagesOfScene(scene_id);

        let mut tx = pool.begin().await?;

        if !Self::lock_scene_inner(&mut tx, movie_id, scene_id).await? {
            return Ok(None);
        }
        let current: Option<(i32,)> =
            sqlx::query_as("SELECT seq_number FROM montages WHERE id = $1 AND scene_id = $2")
                .bind(id)
                .bind(scene_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((old_seq,)) = current else {
            return Ok(None);
        };

        let new_seq = input.seq_number.unwrap_or(old_seq);
        let max = OrderingRepo::max_position(&mut tx, set).await?;
        if let Some(shift) = plan_move(set.label(), old_seq, new_seq, max)? {
            OrderingRepo::apply_shift(&mut tx, set, shift, Some(id)).await?;
        }

        let query = format!(
            "UPDATE montages SET \
                seq_number = $3, ie_flag = $4, sl_flag = $5, location = $6, \
                sub_location = $7, weather = $8, time = $9, description = $10, \
                exp_length = $11, num_extras = $12, notes = $13 \
             WHERE id = $1 AND scene_id = $2 \
             RETURNING {COLUMNS}"
        );
        let montage = bind_details(
            sqlx::query_as::<_, Montage>(&query)
                .bind(id)
                .bind(scene_id)
                .bind(new_seq),
            &details,
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(montage))
    }

    /// Delete a sequence and close the gap in its scene's numbering.
    pub async fn delete(
        pool: &PgPool,
        movie_id: DbId,
        scene_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let set = SiblingSet::MontagesOfScene(scene_id);
        let mut tx = pool.begin().await?;

        if !Self::lock_scene_inner(&mut tx, movie_id, scene_id).await? {
            return Ok(false);
        }
        let removed: Option<(i32,)> = sqlx::query_as(
            "DELETE FROM montages WHERE id = $1 AND scene_id = $2 RETURNING seq_number",
        )
        .bind(id)
        .bind(scene_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((seq_number,)) = removed else {
            return Ok(false);
        };

        OrderingRepo::apply_shift(&mut tx, set, plan_removal(seq_number), None).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// One page of the movie's montage-type scenes, each with its sequences.
    ///
    /// `pattern` is an `ILIKE` pattern matched against the scene's number,
    /// description, and location.
    pub async fn list_grouped(
        pool: &PgPool,
        movie_id: DbId,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MontageGroup>, sqlx::Error> {
        let headers = sqlx::query_as::<_, MontageSceneHeader>(
            "SELECT s.id AS scene_id, s.number, s.description, s.location, s.sub_location \
             FROM scenes s \
             WHERE s.movie_id = $1 AND s.type = 'M' \
               AND ($2::TEXT IS NULL \
                    OR s.number::TEXT ILIKE $2 OR s.description ILIKE $2 \
                    OR s.location ILIKE $2 OR s.sub_location ILIKE $2) \
             ORDER BY s.number \
             LIMIT $3 OFFSET $4",
        )
        .bind(movie_id)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let scene_ids: Vec<DbId> = headers.iter().map(|h| h.scene_id).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM montages WHERE scene_id = ANY($1) ORDER BY seq_number"
        );
        let montages = sqlx::query_as::<_, Montage>(&query)
            .bind(&scene_ids)
            .fetch_all(pool)
            .await?;

        Ok(headers
            .into_iter()
            .map(|scene| {
                let montages = montages
                    .iter()
                    .filter(|m| m.scene_id == scene.scene_id)
                    .cloned()
                    .collect();
                MontageGroup { scene, montages }
            })
            .collect())
    }

    /// Lock a scene of `movie_id` as the parent of its sequences. Returns
    /// `false` if the scene does not exist in that movie.
    async fn lock_scene_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
        scene_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let owned: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM scenes WHERE id = $1 AND movie_id = $2")
                .bind(scene_id)
                .bind(movie_id)
                .fetch_optional(&mut **tx)
                .await?;
        if owned.is_none() {
            return Ok(false);
        }
        OrderingRepo::lock_parent(tx, SiblingSet::MontagesOfScene(scene_id)).await
    }
}

type MontageQuery<'q> =
    sqlx::query::QueryAs<'q, sqlx::Postgres, Montage, sqlx::postgres::PgArguments>;

/// Bind the ten detail columns following the id/scene/seq parameters.
fn bind_details<'q>(query: MontageQuery<'q>, d: &'q MontageDetails) -> MontageQuery<'q> {
    query
        .bind(&d.ie_flag)
        .bind(&d.sl_flag)
        .bind(&d.location)
        .bind(&d.sub_location)
        .bind(&d.weather)
        .bind(&d.time)
        .bind(&d.description)
        .bind(d.exp_length)
        .bind(d.num_extras)
        .bind(&d.notes)
}
