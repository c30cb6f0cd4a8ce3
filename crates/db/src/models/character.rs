//! Character entity model and DTOs.

use breakdown_core::codes::{CharacterType, Gender};
use breakdown_core::error::CoreError;
use breakdown_core::types::{DbId, Position, Timestamp};
use breakdown_core::validation::{
    normalize_text, validate_age_range, validate_non_negative, validate_required,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub movie_id: DbId,
    pub name: String,
    pub gender: String,
    pub lower_age: Option<i32>,
    pub upper_age: Option<i32>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub character_type: String,
    pub description: Option<String>,
    /// Expected screen time in minutes.
    pub exp_screen_time: Option<i32>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or editing a character. Edits replace every field.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacter {
    pub name: String,
    pub gender: String,
    pub lower_age: Option<i32>,
    pub upper_age: Option<i32>,
    #[serde(rename = "type")]
    pub character_type: String,
    pub description: Option<String>,
    pub exp_screen_time: Option<i32>,
    pub notes: Option<String>,
}

pub type UpdateCharacter = CreateCharacter;

impl CreateCharacter {
    /// Check codes and the age range, and trim free text.
    pub fn validated(&self) -> Result<CreateCharacter, CoreError> {
        validate_required("Character name", &self.name).map_err(CoreError::Validation)?;
        let gender = Gender::parse_code(&self.gender).map_err(CoreError::Validation)?;
        let character_type =
            CharacterType::parse_code(&self.character_type).map_err(CoreError::Validation)?;
        validate_age_range(self.lower_age, self.upper_age).map_err(CoreError::Validation)?;
        validate_non_negative("Expected screen time", self.exp_screen_time)
            .map_err(CoreError::Validation)?;

        Ok(CreateCharacter {
            name: self.name.trim().to_string(),
            gender: gender.code().to_string(),
            lower_age: self.lower_age,
            upper_age: self.upper_age,
            character_type: character_type.code().to_string(),
            description: normalize_text(self.description.as_deref()),
            exp_screen_time: self.exp_screen_time,
            notes: normalize_text(self.notes.as_deref()),
        })
    }
}

/// A scene a character appears in, as shown in the character listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterAppearance {
    #[serde(skip)]
    pub char_id: DbId,
    pub scene_id: DbId,
    pub number: Position,
    pub description: Option<String>,
    pub exp_length: Option<i32>,
}

/// Character listing row with the scenes it appears in.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterWithScenes {
    #[serde(flatten)]
    pub character: Character,
    pub scenes: Vec<CharacterAppearance>,
}
