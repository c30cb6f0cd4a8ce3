//! Field-level validation shared by every breakdown entity.
//!
//! Functions return `Result<(), String>` with a user-facing message; callers
//! wrap the message in [`CoreError::Validation`](crate::error::CoreError).

use validator::{Validate, ValidationError};

/// Youngest age a character can be cast at.
pub const MIN_AGE: i32 = 0;

/// Oldest age a character can be cast at.
pub const MAX_AGE: i32 = 125;

#[derive(Debug, Validate)]
#[validate(schema(function = "lower_not_above_upper"))]
struct AgeRange {
    #[validate(range(min = 0, max = 125))]
    lower_age: Option<i32>,
    #[validate(range(min = 0, max = 125))]
    upper_age: Option<i32>,
}

fn lower_not_above_upper(range: &AgeRange) -> Result<(), ValidationError> {
    match (range.lower_age, range.upper_age) {
        (Some(lower), Some(upper)) if lower > upper => Err(ValidationError::new("age_order")),
        _ => Ok(()),
    }
}

/// Validate a character's playing-age range. Either bound may be absent.
pub fn validate_age_range(lower_age: Option<i32>, upper_age: Option<i32>) -> Result<(), String> {
    let range = AgeRange {
        lower_age,
        upper_age,
    };
    range.validate().map_err(|errors| {
        let bound_failed = errors
            .field_errors()
            .keys()
            .any(|field| &**field == "lower_age" || &**field == "upper_age");
        if bound_failed {
            format!("Age must be between {MIN_AGE} and {MAX_AGE}.")
        } else {
            "Lower age cannot be greater than upper age.".to_string()
        }
    })
}

/// Reject blank required text.
pub fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required."));
    }
    Ok(())
}

/// Reject negative durations and counts.
pub fn validate_non_negative(field: &str, value: Option<i32>) -> Result<(), String> {
    match value {
        Some(v) if v < 0 => Err(format!("{field} cannot be negative.")),
        _ => Ok(()),
    }
}

/// Trim optional free text, collapsing blank input to `None`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_age_range --------------------------------------------------

    #[test]
    fn age_upper_boundary_is_accepted() {
        assert!(validate_age_range(Some(125), Some(125)).is_ok());
    }

    #[test]
    fn age_above_boundary_is_rejected() {
        let err = validate_age_range(Some(10), Some(126)).unwrap_err();
        assert_eq!(err, "Age must be between 0 and 125.");
    }

    #[test]
    fn negative_age_is_rejected() {
        assert!(validate_age_range(Some(-1), None).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = validate_age_range(Some(10), Some(5)).unwrap_err();
        assert_eq!(err, "Lower age cannot be greater than upper age.");
    }

    #[test]
    fn missing_bounds_are_accepted() {
        assert!(validate_age_range(None, None).is_ok());
        assert!(validate_age_range(Some(40), None).is_ok());
    }

    // -- text helpers --------------------------------------------------------

    #[test]
    fn blank_required_text_is_rejected() {
        assert_eq!(
            validate_required("Character name", "   "),
            Err("Character name is required.".to_string())
        );
        assert!(validate_required("Character name", "Maya").is_ok());
    }

    #[test]
    fn normalize_text_trims_and_drops_blank() {
        assert_eq!(normalize_text(Some("  rain ")), Some("rain".to_string()));
        assert_eq!(normalize_text(Some("   ")), None);
        assert_eq!(normalize_text(None), None);
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert!(validate_non_negative("Extras", Some(-3)).is_err());
        assert!(validate_non_negative("Extras", Some(0)).is_ok());
        assert!(validate_non_negative("Extras", None).is_ok());
    }
}
