//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement operations open
//! their own transaction; helpers suffixed `_inner` run inside a caller's
//! transaction.

pub mod character_repo;
pub mod dashboard_repo;
pub mod montage_repo;
pub mod movie_repo;
pub mod ordering_repo;
pub mod scene_character_repo;
pub mod scene_repo;
pub mod search_repo;
pub mod user_repo;

pub use character_repo::CharacterRepo;
pub use dashboard_repo::DashboardRepo;
pub use montage_repo::MontageRepo;
pub use movie_repo::MovieRepo;
pub use ordering_repo::{OrderingRepo, SiblingSet};
pub use scene_character_repo::SceneCharacterRepo;
pub use scene_repo::SceneRepo;
pub use search_repo::SearchRepo;
pub use user_repo::UserRepo;

/// Prefix every column of a `COLUMNS` list with a table alias.
pub(crate) fn prefixed(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
