use breakdown_core::error::CoreError;

/// Error returned by repository operations that enforce domain rules.
///
/// Plain lookups return `sqlx::Error` directly; operations that validate
/// input, renumber siblings, or reconcile mappings can also fail with a
/// [`CoreError`]. Any error raised after a transaction has begun drops the
/// uncommitted transaction, which rolls it back.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
