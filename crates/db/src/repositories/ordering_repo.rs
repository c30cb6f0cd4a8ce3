//! Transactional executor for dense sibling ordering.
//!
//! Plans come from [`breakdown_core::ordering`]; this module locks the
//! parent row, reads the current maximum position, and applies bulk shifts
//! inside the caller's transaction.

use breakdown_core::ordering::Shift;
use breakdown_core::types::{DbId, Position};
use sqlx::PgPool;

/// A densely ordered set of rows sharing one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingSet {
    /// Scenes of one movie, ordered by `number`.
    ScenesOfMovie(DbId),
    /// Montage sequences of one scene, ordered by `seq_number`.
    MontagesOfScene(DbId),
}

impl SiblingSet {
    fn table(self) -> &'static str {
        match self {
            SiblingSet::ScenesOfMovie(_) => "scenes",
            SiblingSet::MontagesOfScene(_) => "montages",
        }
    }

    fn parent_table(self) -> &'static str {
        match self {
            SiblingSet::ScenesOfMovie(_) => "movies",
            SiblingSet::MontagesOfScene(_) => "scenes",
        }
    }

    fn parent_column(self) -> &'static str {
        match self {
            SiblingSet::ScenesOfMovie(_) => "movie_id",
            SiblingSet::MontagesOfScene(_) => "scene_id",
        }
    }

    fn position_column(self) -> &'static str {
        match self {
            SiblingSet::ScenesOfMovie(_) => "number",
            SiblingSet::MontagesOfScene(_) => "seq_number",
        }
    }

    pub fn parent_id(self) -> DbId {
        match self {
            SiblingSet::ScenesOfMovie(id) | SiblingSet::MontagesOfScene(id) => id,
        }
    }

    /// Name used in range error messages.
    pub fn label(self) -> &'static str {
        match self {
            SiblingSet::ScenesOfMovie(_) => "Scene number",
            SiblingSet::MontagesOfScene(_) => "Sequence number",
        }
    }
}

/// Executes ordering plans.
pub struct OrderingRepo;

impl OrderingRepo {
    /// Lock the parent row for the rest of the transaction.
    ///
    /// Every renumbering on the same parent takes this lock first, so
    /// concurrent inserts/moves/deletes on one sibling set are serialized.
    /// Returns `false` when the parent does not exist.
    pub async fn lock_parent(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        set: SiblingSet,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT id FROM {} WHERE id = $1 FOR UPDATE",
            set.parent_table()
        );
        let row: Option<(DbId,)> = sqlx::query_as(&query)
            .bind(set.parent_id())
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.is_some())
    }

    /// Highest position in the set, or 0 when empty.
    pub async fn max_position(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        set: SiblingSet,
    ) -> Result<Position, sqlx::Error> {
        let query = format!(
            "SELECT COALESCE(MAX({pos}), 0) FROM {table} WHERE {parent} = $1",
            pos = set.position_column(),
            table = set.table(),
            parent = set.parent_column(),
        );
        let (max,): (Position,) = sqlx::query_as(&query)
            .bind(set.parent_id())
            .fetch_one(&mut **tx)
            .await?;
        Ok(max)
    }

    /// Apply a bulk shift, optionally leaving one row (the one being moved)
    /// untouched. Returns the number of siblings renumbered.
    pub async fn apply_shift(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        set: SiblingSet,
        shift: Shift,
        exclude: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET {pos} = {pos} + $2 \
             WHERE {parent} = $1 \
               AND {pos} >= $3 \
               AND ($4::INTEGER IS NULL OR {pos} <= $4) \
               AND ($5::UUID IS NULL OR id <> $5)",
            table = set.table(),
            pos = set.position_column(),
            parent = set.parent_column(),
        );
        let result = sqlx::query(&query)
            .bind(set.parent_id())
            .bind(shift.delta)
            .bind(shift.from)
            .bind(shift.to)
            .bind(exclude)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    /// Current positions of the set in ascending order.
    ///
    /// Verification helper for tests; no handler calls it.
    pub async fn positions(pool: &PgPool, set: SiblingSet) -> Result<Vec<Position>, sqlx::Error> {
        let query = format!(
            "SELECT {pos} FROM {table} WHERE {parent} = $1 ORDER BY {pos}",
            pos = set.position_column(),
            table = set.table(),
            parent = set.parent_column(),
        );
        let rows: Vec<(Position,)> = sqlx::query_as(&query)
            .bind(set.parent_id())
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(p,)| p).collect())
    }
}
