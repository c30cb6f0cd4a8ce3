//! Scene entity model and DTOs.

use breakdown_core::codes::{Cost, InteriorExterior, Relevance, SceneType, SetLocation};
use breakdown_core::error::CoreError;
use breakdown_core::mapping::CastEntry;
use breakdown_core::types::{DbId, Position, Timestamp};
use breakdown_core::validation::{normalize_text, validate_non_negative};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Column list for the `scenes` table.
pub(crate) const SCENE_COLUMNS: &str = "id, movie_id, number, act, ie_flag, sl_flag, type, \
    location, sub_location, weather, time, description, exp_length, num_extras, \
    camera_notes, lighting_notes, sound_notes, color_notes, prop_notes, other_notes, \
    relevance_quotient, cost_quotient, created_at, updated_at";

/// A row from the `scenes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub movie_id: DbId,
    pub number: Position,
    pub act: Option<String>,
    pub ie_flag: String,
    pub sl_flag: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub scene_type: String,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub weather: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
    /// Expected length in minutes.
    pub exp_length: Option<i32>,
    pub num_extras: Option<i32>,
    pub camera_notes: Option<String>,
    pub lighting_notes: Option<String>,
    pub sound_notes: Option<String>,
    pub color_notes: Option<String>,
    pub prop_notes: Option<String>,
    pub other_notes: Option<String>,
    pub relevance_quotient: Option<String>,
    pub cost_quotient: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Every editable scene field except its number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneDetails {
    pub act: Option<String>,
    pub ie_flag: String,
    pub sl_flag: String,
    #[serde(rename = "type")]
    pub scene_type: String,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub weather: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub exp_length: Option<i32>,
    pub num_extras: Option<i32>,
    pub camera_notes: Option<String>,
    pub lighting_notes: Option<String>,
    pub sound_notes: Option<String>,
    pub color_notes: Option<String>,
    pub prop_notes: Option<String>,
    pub other_notes: Option<String>,
    pub relevance_quotient: Option<String>,
    pub cost_quotient: Option<String>,
}

impl SceneDetails {
    /// Check every code field and trim free text.
    pub fn validated(&self) -> Result<SceneDetails, CoreError> {
        let ie_flag = InteriorExterior::parse_code(&self.ie_flag).map_err(CoreError::Validation)?;
        let sl_flag = SetLocation::parse_code(&self.sl_flag).map_err(CoreError::Validation)?;
        let scene_type = SceneType::parse_code(&self.scene_type).map_err(CoreError::Validation)?;
        let relevance = normalize_text(self.relevance_quotient.as_deref())
            .map(|code| Relevance::parse_code(&code))
            .transpose()
            .map_err(CoreError::Validation)?;
        let cost = normalize_text(self.cost_quotient.as_deref())
            .map(|code| Cost::parse_code(&code))
            .transpose()
            .map_err(CoreError::Validation)?;
        validate_non_negative("Expected length", self.exp_length).map_err(CoreError::Validation)?;
        validate_non_negative("Number of extras", self.num_extras)
            .map_err(CoreError::Validation)?;

        Ok(SceneDetails {
            act: normalize_text(self.act.as_deref()),
            ie_flag: ie_flag.code().to_string(),
            sl_flag: sl_flag.code().to_string(),
            scene_type: scene_type.code().to_string(),
            location: normalize_text(self.location.as_deref()),
            sub_location: normalize_text(self.sub_location.as_deref()),
            weather: normalize_text(self.weather.as_deref()),
            time: normalize_text(self.time.as_deref()),
            description: normalize_text(self.description.as_deref()),
            exp_length: self.exp_length,
            num_extras: self.num_extras,
            camera_notes: normalize_text(self.camera_notes.as_deref()),
            lighting_notes: normalize_text(self.lighting_notes.as_deref()),
            sound_notes: normalize_text(self.sound_notes.as_deref()),
            color_notes: normalize_text(self.color_notes.as_deref()),
            prop_notes: normalize_text(self.prop_notes.as_deref()),
            other_notes: normalize_text(self.other_notes.as_deref()),
            relevance_quotient: relevance.map(|r| r.code().to_string()),
            cost_quotient: cost.map(|c| c.code().to_string()),
        })
    }
}

/// DTO for creating a scene at `number`, together with its cast.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScene {
    pub number: Position,
    #[serde(flatten)]
    pub details: SceneDetails,
    /// Every character of the movie with its role in this scene, or none.
    #[serde(default)]
    pub cast: Vec<CastEntry>,
}

/// DTO for editing a scene.
///
/// Details and cast are replaced wholesale. Omitting `number` keeps the
/// scene where it is.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateScene {
    pub number: Option<Position>,
    #[serde(flatten)]
    pub details: SceneDetails,
    #[serde(default)]
    pub cast: Vec<CastEntry>,
}

/// A character featured in a scene, with its role type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SceneCastMember {
    #[serde(skip)]
    pub scene_id: DbId,
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub role_type: String,
}

/// Scene listing row with its cast.
#[derive(Debug, Clone, Serialize)]
pub struct SceneWithCharacters {
    #[serde(flatten)]
    pub scene: Scene,
    pub characters: Vec<SceneCastMember>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn details() -> SceneDetails {
        SceneDetails {
            ie_flag: "IE".to_string(),
            sl_flag: "S".to_string(),
            scene_type: "D".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn blank_optional_codes_are_allowed() {
        let mut d = details();
        d.relevance_quotient = Some(" ".to_string());
        let clean = d.validated().unwrap();
        assert_eq!(clean.relevance_quotient, None);
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let mut d = details();
        d.ie_flag = "X".to_string();
        assert_matches!(d.validated(), Err(CoreError::Validation(_)));

        let mut d = details();
        d.cost_quotient = Some("Z".to_string());
        assert_matches!(d.validated(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_scene_deserializes_flattened_details() {
        let json = serde_json::json!({
            "number": 2,
            "ie_flag": "I",
            "sl_flag": "L",
            "type": "A",
            "exp_length": 3,
            "cast": [{"character_id": "", "role_type": ""}]
        });
        let input: CreateScene = serde_json::from_value(json).unwrap();
        assert_eq!(input.number, 2);
        assert_eq!(input.details.scene_type, "A");
        assert_eq!(input.details.exp_length, Some(3));
        assert_eq!(input.cast.len(), 1);
    }
}
