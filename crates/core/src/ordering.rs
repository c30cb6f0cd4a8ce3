//! Dense-ordering planner for sibling sets.
//!
//! Scenes within a movie and montage sequences within a scene both carry an
//! integer position that must stay exactly `1..=N`. The functions here
//! decide which bulk shift (if any) an insert, move, or removal needs; the
//! persistence layer executes the shift inside the same transaction as the
//! row change.

use crate::error::CoreError;
use crate::types::Position;

/// First legal position in every sibling set.
pub const FIRST_POSITION: Position = 1;

/// A bulk adjustment of sibling positions.
///
/// Applies `delta` to every sibling whose position lies in `from..=to`
/// (`to == None` means unbounded above).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub from: Position,
    pub to: Option<Position>,
    pub delta: i32,
}

impl Shift {
    /// Whether a sibling at `position` is moved by this shift.
    pub fn covers(&self, position: Position) -> bool {
        position >= self.from && self.to.map_or(true, |to| position <= to)
    }

    /// The position a sibling ends up at after the shift.
    pub fn apply(&self, position: Position) -> Position {
        if self.covers(position) {
            position + self.delta
        } else {
            position
        }
    }
}

/// Plan the insertion of a new sibling at `requested`.
///
/// `max_existing` is the current highest position (0 for an empty set).
/// Inserting onto an occupied position pushes it and everything after it
/// down by one; appending at `max_existing + 1` needs no shift.
pub fn plan_insert(
    label: &str,
    requested: Position,
    max_existing: Position,
) -> Result<Option<Shift>, CoreError> {
    if requested < FIRST_POSITION {
        return Err(CoreError::Validation(format!(
            "{label} must be at least {FIRST_POSITION}"
        )));
    }
    let next = max_existing + 1;
    if requested > next {
        return Err(CoreError::OutOfRange(format!(
            "{label} {requested} is out of range. The next available number is {next}"
        )));
    }
    if requested == next {
        return Ok(None);
    }
    Ok(Some(Shift {
        from: requested,
        to: None,
        delta: 1,
    }))
}

/// Plan moving a sibling from `old` to `new`.
///
/// Moving earlier pushes `[new, old)` down by one; moving later pulls
/// `(old, new]` up by one. The moved row itself is excluded from the shift
/// by the caller.
pub fn plan_move(
    label: &str,
    old: Position,
    new: Position,
    max_existing: Position,
) -> Result<Option<Shift>, CoreError> {
    if new < FIRST_POSITION {
        return Err(CoreError::Validation(format!(
            "{label} must be at least {FIRST_POSITION}"
        )));
    }
    if new > max_existing {
        return Err(CoreError::OutOfRange(format!(
            "{label} {new} is out of range. The highest existing number is {max_existing}"
        )));
    }
    let shift = match new.cmp(&old) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => Some(Shift {
            from: new,
            to: Some(old - 1),
            delta: 1,
        }),
        std::cmp::Ordering::Greater => Some(Shift {
            from: old + 1,
            to: Some(new),
            delta: -1,
        }),
    };
    Ok(shift)
}

/// Plan closing the gap left by removing the sibling at `removed`.
pub fn plan_removal(removed: Position) -> Shift {
    Shift {
        from: removed + 1,
        to: None,
        delta: -1,
    }
}

/// Whether `positions` is a permutation of `1..=positions.len()`.
pub fn is_dense(positions: &[Position]) -> bool {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .zip(FIRST_POSITION..)
        .all(|(actual, expected)| *actual == expected)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
