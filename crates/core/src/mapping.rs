//! Scene cast validation.
//!
//! A scene form submits every character of the movie together with the role
//! it plays in the scene (or no role). Only the entries with a role survive;
//! each survivor must name a character and carry a known appearance type.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::codes::AppearanceType;
use crate::error::CoreError;
use crate::types::DbId;

/// One candidate row of a scene's cast, as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastEntry {
    #[serde(default)]
    pub character_id: String,
    #[serde(default)]
    pub role_type: Option<String>,
}

/// A validated cast member ready to be written to `scene_char_map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastMember {
    pub character_id: DbId,
    pub role: AppearanceType,
}

/// Filter and validate submitted cast entries.
///
/// Entries without a role are dropped. Any remaining entry with a missing
/// or malformed character id, an unknown role, or a character listed twice
/// rejects the whole cast.
pub fn validate_cast(entries: &[CastEntry]) -> Result<Vec<CastMember>, CoreError> {
    let mut seen = HashSet::new();
    let mut members = Vec::new();

    for entry in entries {
        let role_code = match entry.role_type.as_deref().map(str::trim) {
            None | Some("") => continue,
            Some(code) => code,
        };

        let role = AppearanceType::from_code(role_code).ok_or_else(|| {
            CoreError::InvalidMapping(format!(
                "Invalid role type '{role_code}'. Allowed values: D, N, O, B"
            ))
        })?;

        let raw_id = entry.character_id.trim();
        if raw_id.is_empty() {
            return Err(CoreError::InvalidMapping(
                "Every mapped character needs a character id".to_string(),
            ));
        }
        let character_id: DbId = raw_id.parse().map_err(|_| {
            CoreError::InvalidMapping(format!("Malformed character id '{raw_id}'"))
        })?;

        if !seen.insert(character_id) {
            return Err(CoreError::InvalidMapping(format!(
                "Character {character_id} is listed more than once"
            )));
        }

        members.push(CastMember { character_id, role });
    }

    Ok(members)
}
