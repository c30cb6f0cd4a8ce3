/// All primary keys are UUIDs generated by the application.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Ordinal position inside a sibling set (scene number, sequence number).
pub type Position = i32;

/// Generate a fresh primary key.
pub fn new_id() -> DbId {
    uuid::Uuid::new_v4()
}
