//! Movie entity model and DTOs.

use breakdown_core::codes::DefaultFlag;
use breakdown_core::error::CoreError;
use breakdown_core::types::{DbId, Timestamp};
use breakdown_core::validation::{normalize_text, validate_required};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub logline: Option<String>,
    pub description: Option<String>,
    /// `"Y"` for the user's default movie, `"N"` otherwise.
    pub default_flag: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Movie {
    pub fn is_default(&self) -> bool {
        DefaultFlag::from_code(&self.default_flag) == Some(DefaultFlag::Yes)
    }
}

/// DTO for creating or editing a movie. Edits replace every field.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovie {
    pub name: String,
    pub logline: Option<String>,
    pub description: Option<String>,
}

pub type UpdateMovie = CreateMovie;

impl CreateMovie {
    /// Check required fields and trim free text.
    pub fn validated(&self) -> Result<CreateMovie, CoreError> {
        validate_required("Movie name", &self.name).map_err(CoreError::Validation)?;
        Ok(CreateMovie {
            name: self.name.trim().to_string(),
            logline: normalize_text(self.logline.as_deref()),
            description: normalize_text(self.description.as_deref()),
        })
    }
}

/// The user's current default movie.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DefaultMovie {
    pub id: DbId,
    pub name: String,
}

/// Entry for the movie picker.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieChoice {
    pub id: DbId,
    pub name: String,
    pub default_flag: String,
}

/// Movie listing row enriched with its main cast and scene count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieSummary {
    pub id: DbId,
    pub name: String,
    pub logline: Option<String>,
    pub description: Option<String>,
    pub default_flag: String,
    pub main_characters: Vec<String>,
    pub scene_count: i64,
    pub created_at: Timestamp,
}
