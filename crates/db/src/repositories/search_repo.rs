//! Advanced search across the acting user's movies.
//!
//! Each criterion is bound as an optional parameter guarded by
//! `($n IS NULL OR ...)`, so one static statement serves every filter
//! combination. Ranges are inclusive on both ends.

use breakdown_core::codes::{
    CharacterType, Cost, Gender, InteriorExterior, Relevance, SceneType, SetLocation,
};
use breakdown_core::search::{
    CharacterCriteria, MontageCriteria, MovieCriteria, SceneCriteria, SearchCriteria, ValueRange,
};
use breakdown_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::MovieSummary;
use crate::models::search::{
    CharacterHit, CharacterSearchRow, MontageHit, SceneHit, SceneSearchRow, SearchResults,
};
use crate::models::scene::SCENE_COLUMNS;
use crate::repositories::movie_repo::SUMMARY_SELECT;
use crate::repositories::{character_repo, montage_repo, prefixed, CharacterRepo, SceneRepo};

/// Advanced search queries.
pub struct SearchRepo;

impl SearchRepo {
    /// One page of results for `criteria`, restricted to `user_id`'s movies.
    pub async fn search(
        pool: &PgPool,
        user_id: DbId,
        criteria: &SearchCriteria,
        limit: i64,
        offset: i64,
    ) -> Result<SearchResults, sqlx::Error> {
        let results = match criteria {
            SearchCriteria::Movies(c) => {
                SearchResults::Movies(Self::movies(pool, user_id, c, limit, offset).await?)
            }
            SearchCriteria::Characters(c) => {
                SearchResults::Characters(Self::characters(pool, user_id, c, limit, offset).await?)
            }
            SearchCriteria::Scenes(c) => {
                SearchResults::Scenes(Self::scenes(pool, user_id, c, limit, offset).await?)
            }
            SearchCriteria::Montages(c) => {
                SearchResults::Montages(Self::montages(pool, user_id, c, limit, offset).await?)
            }
        };
        tracing::debug!(%user_id, hits = results.len(), "Search completed");
        Ok(results)
    }

    async fn movies(
        pool: &PgPool,
        user_id: DbId,
        c: &MovieCriteria,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MovieSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT} \
             WHERE m.user_id = $1 \
               AND ($2::TEXT IS NULL OR m.name ILIKE $2) \
               AND ($3::TEXT IS NULL OR m.logline ILIKE $3) \
               AND ($4::TEXT IS NULL OR m.description ILIKE $4) \
             ORDER BY m.name, m.id \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, MovieSummary>(&query)
            .bind(user_id)
            .bind(&c.name)
            .bind(&c.logline)
            .bind(&c.description)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    async fn characters(
        pool: &PgPool,
        user_id: DbId,
        c: &CharacterCriteria,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CharacterHit>, sqlx::Error> {
        let (age_min, age_max) = bounds(c.age);
        let (time_min, time_max) = bounds(c.screen_time);
        let query = format!(
            "SELECT {cols}, mv.name AS movie_name \
             FROM characters c \
             JOIN movies mv ON mv.id = c.movie_id \
             WHERE mv.user_id = $1 \
               AND ($2::TEXT IS NULL OR mv.name ILIKE $2) \
               AND ($3::TEXT IS NULL OR c.name ILIKE $3) \
               AND ($4::TEXT IS NULL OR c.description ILIKE $4) \
               AND ($5::TEXT IS NULL OR c.gender = $5) \
               AND ($6::INTEGER IS NULL OR (c.lower_age <= $7 AND c.upper_age >= $6)) \
               AND ($8::TEXT IS NULL OR c.type = $8) \
               AND ($9::INTEGER IS NULL OR c.exp_screen_time BETWEEN $9 AND $10) \
               AND ($11::TEXT IS NULL OR c.notes ILIKE $11) \
             ORDER BY mv.name, c.name, c.id \
             LIMIT $12 OFFSET $13",
            cols = prefixed(character_repo::COLUMNS, "c"),
        );
        let rows = sqlx::query_as::<_, CharacterSearchRow>(&query)
            .bind(user_id)
            .bind(&c.movie)
            .bind(&c.name)
            .bind(&c.description)
            .bind(c.gender.map(Gender::code))
            .bind(age_min)
            .bind(age_max)
            .bind(c.character_type.map(CharacterType::code))
            .bind(time_min)
            .bind(time_max)
            .bind(&c.notes)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.character.id).collect();
        let mut appearances = CharacterRepo::appearances(pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| CharacterHit {
                scenes: appearances.remove(&row.character.id).unwrap_or_default(),
                character: row.character,
                movie_name: row.movie_name,
            })
            .collect())
    }

    async fn scenes(
        pool: &PgPool,
        user_id: DbId,
        c: &SceneCriteria,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SceneHit>, sqlx::Error> {
        let (length_min, length_max) = bounds(c.length);
        let (extras_min, extras_max) = bounds(c.extras);
        let query = format!(
            "SELECT {cols}, mv.name AS movie_name \
             FROM scenes s \
             JOIN movies mv ON mv.id = s.movie_id \
             WHERE mv.user_id = $1 \
               AND ($2::TEXT IS NULL OR mv.name ILIKE $2) \
               AND ($3::TEXT IS NULL OR EXISTS ( \
                    SELECT 1 FROM scene_char_map m \
                    JOIN characters ch ON ch.id = m.char_id \
                    WHERE m.scene_id = s.id AND ch.name ILIKE $3)) \
               AND ($4::TEXT IS NULL OR s.number::TEXT ILIKE $4) \
               AND ($5::TEXT IS NULL OR s.description ILIKE $5) \
               AND ($6::TEXT IS NULL OR s.act ILIKE $6) \
               AND ($7::TEXT IS NULL OR s.ie_flag = $7) \
               AND ($8::TEXT IS NULL OR s.sl_flag = $8) \
               AND ($9::TEXT IS NULL OR s.type = $9) \
               AND ($10::TEXT IS NULL OR s.location ILIKE $10) \
               AND ($11::TEXT IS NULL OR s.sub_location ILIKE $11) \
               AND ($12::TEXT IS NULL OR s.weather ILIKE $12) \
               AND ($13::TEXT IS NULL OR s.time ILIKE $13) \
               AND ($14::INTEGER IS NULL OR s.exp_length BETWEEN $14 AND $15) \
               AND ($16::INTEGER IS NULL OR s.num_extras BETWEEN $16 AND $17) \
               AND ($18::TEXT IS NULL OR s.relevance_quotient = $18) \
               AND ($19::TEXT IS NULL OR s.cost_quotient = $19) \
               AND ($20::TEXT IS NULL \
                    OR s.camera_notes ILIKE $20 OR s.lighting_notes ILIKE $20 \
                    OR s.sound_notes ILIKE $20 OR s.color_notes ILIKE $20 \
                    OR s.prop_notes ILIKE $20 OR s.other_notes ILIKE $20) \
             ORDER BY mv.name, s.number, s.id \
             LIMIT $21 OFFSET $22",
            cols = prefixed(SCENE_COLUMNS, "s"),
        );
        let rows = sqlx::query_as::<_, SceneSearchRow>(&query)
            .bind(user_id)
            .bind(&c.movie)
            .bind(&c.character)
            .bind(&c.number)
            .bind(&c.description)
            .bind(&c.act)
            .bind(c.ie_flag.map(InteriorExterior::code))
            .bind(c.sl_flag.map(SetLocation::code))
            .bind(c.scene_type.map(SceneType::code))
            .bind(&c.location)
            .bind(&c.sub_location)
            .bind(&c.weather)
            .bind(&c.time)
            .bind(length_min)
            .bind(length_max)
            .bind(extras_min)
            .bind(extras_max)
            .bind(c.relevance.map(Relevance::code))
            .bind(c.cost.map(Cost::code))
            .bind(&c.notes)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.scene.id).collect();
        let mut cast = SceneRepo::cast_members(pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| SceneHit {
                characters: cast.remove(&row.scene.id).unwrap_or_default(),
                scene: row.scene,
                movie_name: row.movie_name,
            })
            .collect())
    }

    async fn montages(
        pool: &PgPool,
        user_id: DbId,
        c: &MontageCriteria,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MontageHit>, sqlx::Error> {
        let (length_min, length_max) = bounds(c.length);
        let (extras_min, extras_max) = bounds(c.extras);
        let query = format!(
            "SELECT {cols}, s.number AS scene_number, mv.name AS movie_name \
             FROM montages t \
             JOIN scenes s ON s.id = t.scene_id \
             JOIN movies mv ON mv.id = s.movie_id \
             WHERE mv.user_id = $1 \
               AND ($2::TEXT IS NULL OR mv.name ILIKE $2) \
               AND ($3::TEXT IS NULL OR s.number::TEXT ILIKE $3) \
               AND ($4::TEXT IS NULL OR t.description ILIKE $4) \
               AND ($5::TEXT IS NULL OR t.ie_flag = $5) \
               AND ($6::TEXT IS NULL OR t.sl_flag = $6) \
               AND ($7::TEXT IS NULL OR t.location ILIKE $7) \
               AND ($8::TEXT IS NULL OR t.sub_location ILIKE $8) \
               AND ($9::TEXT IS NULL OR t.weather ILIKE $9) \
               AND ($10::TEXT IS NULL OR t.time ILIKE $10) \
               AND ($11::INTEGER IS NULL OR t.exp_length BETWEEN $11 AND $12) \
               AND ($13::INTEGER IS NULL OR t.num_extras BETWEEN $13 AND $14) \
               AND ($15::TEXT IS NULL OR t.notes ILIKE $15) \
             ORDER BY mv.name, s.number, t.seq_number, t.id \
             LIMIT $16 OFFSET $17",
            cols = prefixed(montage_repo::COLUMNS, "t"),
        );
        sqlx::query_as::<_, MontageHit>(&query)
            .bind(user_id)
            .bind(&c.movie)
            .bind(&c.scene_number)
            .bind(&c.description)
            .bind(c.ie_flag.map(InteriorExterior::code))
            .bind(c.sl_flag.map(SetLocation::code))
            .bind(&c.location)
            .bind(&c.sub_location)
            .bind(&c.weather)
            .bind(&c.time)
            .bind(length_min)
            .bind(length_max)
            .bind(extras_min)
            .bind(extras_max)
            .bind(&c.notes)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

fn bounds(range: Option<ValueRange>) -> (Option<i32>, Option<i32>) {
    match range {
        Some(r) => (Some(r.min), Some(r.max)),
        None => (None, None),
    }
}
