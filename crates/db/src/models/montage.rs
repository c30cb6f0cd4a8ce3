//! Montage sequence model and DTOs.

use breakdown_core::codes::{InteriorExterior, SetLocation};
use breakdown_core::error::CoreError;
use breakdown_core::types::{DbId, Position, Timestamp};
use breakdown_core::validation::{normalize_text, validate_non_negative};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `montages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Montage {
    pub id: DbId,
    pub scene_id: DbId,
    pub seq_number: Position,
    pub ie_flag: String,
    pub sl_flag: String,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub weather: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
    /// Expected length in seconds.
    pub exp_length: Option<i32>,
    pub num_extras: Option<i32>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Every editable sequence field except its sequence number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MontageDetails {
    pub ie_flag: String,
    pub sl_flag: String,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub weather: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub exp_length: Option<i32>,
    pub num_extras: Option<i32>,
    pub notes: Option<String>,
}

impl MontageDetails {
    pub fn validated(&self) -> Result<MontageDetails, CoreError> {
        let ie_flag = InteriorExterior::parse_code(&self.ie_flag).map_err(CoreError::Validation)?;
        let sl_flag = SetLocation::parse_code(&self.sl_flag).map_err(CoreError::Validation)?;
        validate_non_negative("Expected length", self.exp_length).map_err(CoreError::Validation)?;
        validate_non_negative("Number of extras", self.num_extras)
            .map_err(CoreError::Validation)?;

        Ok(MontageDetails {
            ie_flag: ie_flag.code().to_string(),
            sl_flag: sl_flag.code().to_string(),
            location: normalize_text(self.location.as_deref()),
            sub_location: normalize_text(self.sub_location.as_deref()),
            weather: normalize_text(self.weather.as_deref()),
            time: normalize_text(self.time.as_deref()),
            description: normalize_text(self.description.as_deref()),
            exp_length: self.exp_length,
            num_extras: self.num_extras,
            notes: normalize_text(self.notes.as_deref()),
        })
    }
}

/// DTO for creating a sequence at `seq_number` within a scene.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMontage {
    pub seq_number: Position,
    #[serde(flatten)]
    pub details: MontageDetails,
}

/// DTO for editing a sequence. Omitting `seq_number` keeps its position.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMontage {
    pub seq_number: Option<Position>,
    #[serde(flatten)]
    pub details: MontageDetails,
}

/// The montage-type scene heading a group of sequences.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MontageSceneHeader {
    pub scene_id: DbId,
    pub number: Position,
    pub description: Option<String>,
    pub location: Option<String>,
    pub sub_location: Option<String>,
}

/// A montage scene with its sequences in order.
#[derive(Debug, Clone, Serialize)]
pub struct MontageGroup {
    #[serde(flatten)]
    pub scene: MontageSceneHeader,
    pub montages: Vec<Montage>,
}
