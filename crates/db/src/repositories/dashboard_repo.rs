//! Read-only aggregation for the movie dashboard.

use breakdown_core::codes::CharacterType;
use breakdown_core::dashboard::{SceneTally, LONGEST_SCENES_LIMIT};
use breakdown_core::types::DbId;
use sqlx::PgPool;

use crate::models::dashboard::{CastGroups, Dashboard, DashboardMovie, LongScene};

pub struct DashboardRepo;

impl DashboardRepo {
    /// Assemble the dashboard for `movie_id`, or `None` if it does not exist.
    ///
    /// Ownership is checked by the caller.
    pub async fn for_movie(pool: &PgPool, movie_id: DbId) -> Result<Option<Dashboard>, sqlx::Error> {
        let movie = sqlx::query_as::<_, DashboardMovie>(
            "SELECT id, name, logline, description FROM movies WHERE id = $1",
        )
        .bind(movie_id)
        .fetch_optional(pool)
        .await?;
        let Some(movie) = movie else {
            return Ok(None);
        };

        let named: Vec<(String, String)> = sqlx::query_as(
            "SELECT name, type FROM characters \
             WHERE movie_id = $1 AND type IN ('M', 'P', 'S') \
             ORDER BY name, id",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await?;

        let mut characters = CastGroups::default();
        for (name, code) in named {
            match CharacterType::from_code(&code) {
                Some(CharacterType::Main) => characters.main.push(name),
                Some(CharacterType::Primary) => characters.primary.push(name),
                Some(CharacterType::Secondary) => characters.secondary.push(name),
                _ => {}
            }
        }

        let flags: Vec<(String, String)> =
            sqlx::query_as("SELECT sl_flag, type FROM scenes WHERE movie_id = $1")
                .bind(movie_id)
                .fetch_all(pool)
                .await?;
        let scenes: SceneTally = flags
            .iter()
            .map(|(sl, ty)| (sl.as_str(), ty.as_str()))
            .collect();

        let longest_scenes = sqlx::query_as::<_, LongScene>(
            "SELECT id, number, description, exp_length FROM scenes \
             WHERE movie_id = $1 AND exp_length IS NOT NULL \
             ORDER BY exp_length DESC, number \
             LIMIT $2",
        )
        .bind(movie_id)
        .bind(LONGEST_SCENES_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(Some(Dashboard {
            movie,
            characters,
            scenes,
            longest_scenes,
        }))
    }
}
