use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A requested position lies outside the sibling set's valid range.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A scene-character association failed validation; nothing was written.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("No default movie found")]
    NoDefaultMovie,

    #[error("Internal error: {0}")]
    Internal(String),
}
