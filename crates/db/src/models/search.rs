//! Result shapes for the advanced search screen.

use breakdown_core::types::Position;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::character::{Character, CharacterAppearance};
use crate::models::montage::Montage;
use crate::models::movie::MovieSummary;
use crate::models::scene::{Scene, SceneCastMember};

/// Character row joined with its movie name.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterSearchRow {
    #[sqlx(flatten)]
    pub character: Character,
    pub movie_name: String,
}

/// Scene row joined with its movie name.
#[derive(Debug, Clone, FromRow)]
pub struct SceneSearchRow {
    #[sqlx(flatten)]
    pub scene: Scene,
    pub movie_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterHit {
    #[serde(flatten)]
    pub character: Character,
    pub movie_name: String,
    pub scenes: Vec<CharacterAppearance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneHit {
    #[serde(flatten)]
    pub scene: Scene,
    pub movie_name: String,
    pub characters: Vec<SceneCastMember>,
}

/// Montage sequence with its scene number and movie name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MontageHit {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub montage: Montage,
    pub scene_number: Position,
    pub movie_name: String,
}

/// One page of search results, tagged by entity.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "entity", content = "results")]
pub enum SearchResults {
    Movies(Vec<MovieSummary>),
    Characters(Vec<CharacterHit>),
    Scenes(Vec<SceneHit>),
    Montages(Vec<MontageHit>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Movies(v) => v.len(),
            SearchResults::Characters(v) => v.len(),
            SearchResults::Scenes(v) => v.len(),
            SearchResults::Montages(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
