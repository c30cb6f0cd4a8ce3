//! Request extractors.
//!
//! - [`acting_user::ActingUser`] -- Resolves the user a request acts as.

pub mod acting_user;
