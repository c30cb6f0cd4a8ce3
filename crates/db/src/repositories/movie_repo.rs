//! Repository for the `movies` table.
//!
//! A user with at least one movie always has exactly one default movie
//! (`default_flag = 'Y'`). Creating, editing, or selecting a movie makes it
//! the default; deleting the default promotes the newest remaining movie.

use breakdown_core::error::CoreError;
use breakdown_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::movie::{
    CreateMovie, DefaultMovie, Movie, MovieChoice, MovieSummary, UpdateMovie,
};

/// Column list for the `movies` table.
const COLUMNS: &str = "id, user_id, name, logline, description, default_flag, created_at, updated_at";

/// Movie operations, all scoped to the owning user.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie and make it the user's default.
    pub async fn create(pool: &PgPool, user_id: DbId, input: &CreateMovie) -> StoreResult<Movie> {
        let input = input.validated()?;
        let mut tx = pool.begin().await?;

        Self::lock_user_inner(&mut tx, user_id).await?;
        Self::clear_default_inner(&mut tx, user_id).await?;

        let query = format!(
            "INSERT INTO movies (id, user_id, name, logline, description, default_flag) \
             VALUES ($1, $2, $3, $4, $5, 'Y') \
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(new_id())
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.logline)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(movie_id = %movie.id, %user_id, "Movie created as default");
        Ok(movie)
    }

    /// Find a movie owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a movie's fields and make it the default.
    ///
    /// Returns `None` if the user owns no movie with this `id`.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
        input: &UpdateMovie,
    ) -> StoreResult<Option<Movie>> {
        let input = input.validated()?;
        let mut tx = pool.begin().await?;

        Self::lock_user_inner(&mut tx, user_id).await?;
        if !Self::lock_inner(&mut tx, user_id, id).await? {
            return Ok(None);
        }
        Self::clear_default_inner(&mut tx, user_id).await?;

        let query = format!(
            "UPDATE movies SET name = $3, logline = $4, description = $5, default_flag = 'Y' \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.logline)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(movie))
    }

    /// Make `id` the user's default movie.
    ///
    /// Returns `None` if the user owns no movie with this `id`.
    pub async fn set_default(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        Self::lock_user_inner(&mut tx, user_id).await?;
        if !Self::lock_inner(&mut tx, user_id, id).await? {
            return Ok(None);
        }
        Self::clear_default_inner(&mut tx, user_id).await?;

        let query = format!(
            "UPDATE movies SET default_flag = 'Y' WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(movie))
    }

    /// The user's default movie.
    ///
    /// Fails with [`CoreError::NoDefaultMovie`] when the user has no movies.
    pub async fn find_default(pool: &PgPool, user_id: DbId) -> StoreResult<DefaultMovie> {
        let movie = sqlx::query_as::<_, DefaultMovie>(
            "SELECT id, name FROM movies WHERE user_id = $1 AND default_flag = 'Y'",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        movie.ok_or_else(|| CoreError::NoDefaultMovie.into())
    }

    /// All of the user's movies for the picker, newest first.
    pub async fn list_choices(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<MovieChoice>, sqlx::Error> {
        sqlx::query_as::<_, MovieChoice>(
            "SELECT id, name, default_flag FROM movies \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// One page of the user's movies, newest first, with main characters and
    /// scene counts.
    ///
    /// `pattern` is an `ILIKE` pattern matched against name, logline, and
    /// description.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MovieSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT} \
             WHERE m.user_id = $1 \
               AND ($2::TEXT IS NULL \
                    OR m.name ILIKE $2 OR m.logline ILIKE $2 OR m.description ILIKE $2) \
             ORDER BY m.created_at DESC, m.id \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, MovieSummary>(&query)
            .bind(user_id)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a movie and everything that belongs to it.
    ///
    /// Removes, in order: the montages and scene-character rows of its
    /// scenes, its characters, its scenes, then the movie. If it was the
    /// default, the user's most recently created remaining movie becomes the
    /// default. Returns `false` if the user owns no movie with this `id`.
    pub async fn delete(pool: &PgPool, user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        Self::lock_user_inner(&mut tx, user_id).await?;
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT default_flag FROM movies WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((default_flag,)) = row else {
            return Ok(false);
        };

        sqlx::query("SELECT id FROM scenes WHERE movie_id = $1 FOR UPDATE")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let montages = sqlx::query(
            "DELETE FROM montages \
             WHERE scene_id IN (SELECT id FROM scenes WHERE movie_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let mappings = sqlx::query(
            "DELETE FROM scene_char_map \
             WHERE scene_id IN (SELECT id FROM scenes WHERE movie_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let characters = sqlx::query("DELETE FROM characters WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let scenes = sqlx::query("DELETE FROM scenes WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if default_flag == "Y" {
            sqlx::query(
                "UPDATE movies SET default_flag = 'Y' \
                 WHERE id = ( \
                     SELECT id FROM movies WHERE user_id = $1 \
                     ORDER BY created_at DESC, id LIMIT 1 \
                 )",
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            movie_id = %id,
            montages = montages.rows_affected(),
            mappings = mappings.rows_affected(),
            characters = characters.rows_affected(),
            scenes = scenes.rows_affected(),
            "Movie deleted with dependents"
        );
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Lock the owning user row so default-flag swaps for one user are
    /// serialized.
    async fn lock_user_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Lock one of the user's movies. Returns `false` if it does not exist.
    async fn lock_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM movies WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut **tx)
                .await?;
        Ok(row.is_some())
    }

    /// Demote the user's current default, if any.
    async fn clear_default_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE movies SET default_flag = 'N' WHERE user_id = $1 AND default_flag = 'Y'",
        )
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

/// Movie listing projection shared by the listing and search screens.
pub(crate) const SUMMARY_SELECT: &str = "SELECT m.id, m.name, m.logline, m.description, m.default_flag, \
        ARRAY(SELECT c.name FROM characters c \
              WHERE c.movie_id = m.id AND c.type = 'M' ORDER BY c.name) AS main_characters, \
        (SELECT COUNT(*) FROM scenes s WHERE s.movie_id = m.id) AS scene_count, \
        m.created_at \
     FROM movies m";
