//! Scene-character association model.

use breakdown_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `scene_char_map` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SceneCharacterMap {
    pub id: DbId,
    pub scene_id: DbId,
    pub char_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub role_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One character of a movie and its role in a given scene.
///
/// `role_type` is empty when the character does not appear in the scene
/// (or no scene was given).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CastSlot {
    pub id: DbId,
    pub name: String,
    pub role_type: String,
}
