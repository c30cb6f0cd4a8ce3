//! Read models for the movie dashboard.

use breakdown_core::dashboard::SceneTally;
use breakdown_core::types::{DbId, Position};
use serde::Serialize;
use sqlx::FromRow;

/// Movie heading shown on the dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardMovie {
    pub id: DbId,
    pub name: String,
    pub logline: Option<String>,
    pub description: Option<String>,
}

/// Character names grouped by importance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CastGroups {
    pub main: Vec<String>,
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
}

/// One of the longest scenes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LongScene {
    pub id: DbId,
    pub number: Position,
    pub description: Option<String>,
    pub exp_length: Option<i32>,
}

/// Everything the dashboard renders for one movie.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub movie: DashboardMovie,
    pub characters: CastGroups,
    pub scenes: SceneTally,
    pub longest_scenes: Vec<LongScene>,
}
