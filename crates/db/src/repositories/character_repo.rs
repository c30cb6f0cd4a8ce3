//! Repository for the `characters` table.

use std::collections::HashMap;

use breakdown_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::character::{
    Character, CharacterAppearance, CharacterWithScenes, CreateCharacter, UpdateCharacter,
};
use crate::repositories::prefixed;

/// Column list for the `characters` table.
pub(crate) const COLUMNS: &str = "id, movie_id, name, gender, lower_age, upper_age, type, \
    description, exp_screen_time, notes, created_at, updated_at";

/// Listing rank: main, primary, secondary, tertiary, other.
pub(crate) const TYPE_RANK: &str = "CASE c.type \
    WHEN 'M' THEN 1 WHEN 'P' THEN 2 WHEN 'S' THEN 3 WHEN 'T' THEN 4 WHEN 'O' THEN 5 \
    ELSE 6 END";

/// Character operations, scoped to one movie.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character into `movie_id`.
    pub async fn create(
        pool: &PgPool,
        movie_id: DbId,
        input: &CreateCharacter,
    ) -> StoreResult<Character> {
        let input = input.validated()?;
        let query = format!(
            "INSERT INTO characters \
                (id, movie_id, name, gender, lower_age, upper_age, type, \
                 description, exp_screen_time, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(new_id())
            .bind(movie_id)
            .bind(&input.name)
            .bind(&input.gender)
            .bind(input.lower_age)
            .bind(input.upper_age)
            .bind(&input.character_type)
            .bind(&input.description)
            .bind(input.exp_screen_time)
            .bind(&input.notes)
            .fetch_one(pool)
            .await?;
        Ok(character)
    }

    /// Find a character of `movie_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        movie_id: DbId,
        id: DbId,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1 AND movie_id = $2");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(movie_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a character's fields.
    ///
    /// Returns `None` if `movie_id` has no character with this `id`.
    pub async fn update(
        pool: &PgPool,
        movie_id: DbId,
        id: DbId,
        input: &UpdateCharacter,
    ) -> StoreResult<Option<Character>> {
        let input = input.validated()?;
        let query = format!(
            "UPDATE characters SET \
                name = $3, gender = $4, lower_age = $5, upper_age = $6, type = $7, \
                description = $8, exp_screen_time = $9, notes = $10 \
             WHERE id = $1 AND movie_id = $2 \
             RETURNING {COLUMNS}"
        );
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(movie_id)
            .bind(&input.name)
            .bind(&input.gender)
            .bind(input.lower_age)
            .bind(input.upper_age)
            .bind(&input.character_type)
            .bind(&input.description)
            .bind(input.exp_screen_time)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await?;
        Ok(character)
    }

    /// Delete a character together with its scene associations.
    ///
    /// Returns `false` if `movie_id` has no character with this `id`.
    pub async fn delete(pool: &PgPool, movie_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM characters WHERE id = $1 AND movie_id = $2 FOR UPDATE")
                .bind(id)
                .bind(movie_id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM scene_char_map WHERE char_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// One page of a movie's characters, ranked by type then name, each with
    /// the scenes it appears in.
    ///
    /// `pattern` is an `ILIKE` pattern matched against name, description,
    /// and notes.
    pub async fn list(
        pool: &PgPool,
        movie_id: DbId,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CharacterWithScenes>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM characters c \
             WHERE c.movie_id = $1 \
               AND ($2::TEXT IS NULL \
                    OR c.name ILIKE $2 OR c.description ILIKE $2 OR c.notes ILIKE $2) \
             ORDER BY {TYPE_RANK}, c.name, c.id \
             LIMIT $3 OFFSET $4",
            cols = prefixed(COLUMNS, "c"),
        );
        let characters = sqlx::query_as::<_, Character>(&query)
            .bind(movie_id)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = characters.iter().map(|c| c.id).collect();
        let mut appearances = Self::appearances(pool, &ids).await?;

        Ok(characters
            .into_iter()
            .map(|character| {
                let scenes = appearances.remove(&character.id).unwrap_or_default();
                CharacterWithScenes { character, scenes }
            })
            .collect())
    }

    /// Scenes featuring each of `char_ids`, in scene-number order.
    pub async fn appearances(
        pool: &PgPool,
        char_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<CharacterAppearance>>, sqlx::Error> {
        if char_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, CharacterAppearance>(
            "SELECT m.char_id, s.id AS scene_id, s.number, s.description, s.exp_length \
             FROM scene_char_map m \
             JOIN scenes s ON s.id = m.scene_id \
             WHERE m.char_id = ANY($1) \
             ORDER BY s.number",
        )
        .bind(char_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<DbId, Vec<CharacterAppearance>> = HashMap::new();
        for row in rows {
            grouped.entry(row.char_id).or_default().push(row);
        }
        Ok(grouped)
    }
}
