//! Domain logic for the screenplay breakdown service.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` crate
//! executes the plans and validated inputs produced here.

pub mod codes;
pub mod dashboard;
pub mod error;
pub mod mapping;
pub mod ordering;
pub mod search;
pub mod types;
pub mod validation;
