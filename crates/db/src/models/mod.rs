//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` input DTO with a `validated` step that trims text and
//!   checks codes before any row is touched
//! - Enriched listing shapes where the screens need joined data

pub mod character;
pub mod dashboard;
pub mod montage;
pub mod movie;
pub mod scene;
pub mod scene_character;
pub mod search;
pub mod user;
