//! Listing and search helpers.
//!
//! Turns page/limit query parameters into clamped values and translates the
//! label-based filters of the search screen (`{"field": "Int Ext", "value":
//! "INT./EXT."}`) into typed criteria the repositories bind as SQL
//! parameters.

use serde::{Deserialize, Serialize};

use crate::codes::{CharacterType, Cost, Gender, InteriorExterior, Relevance, SceneType, SetLocation};
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Default number of rows per listing page.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Maximum number of rows per listing page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a 1-based page number.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset of a 1-based page, saturating for absurdly large pages.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

/// Build a case-insensitive substring pattern for `ILIKE`.
///
/// LIKE metacharacters in the term are escaped. Blank input yields `None`.
pub fn contains_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

// ---------------------------------------------------------------------------
// Range buckets
// ---------------------------------------------------------------------------

/// Inclusive numeric range selected by a bucket label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: i32,
    pub max: i32,
}

type Bucket = (&'static str, i32, i32);

/// Character playing-age buckets (years).
pub const AGE_BUCKETS: &[Bucket] = &[
    ("< 10", 0, 10),
    ("10 - 20", 10, 20),
    ("20 - 30", 20, 30),
    ("30 - 40", 30, 40),
    ("40 - 50", 40, 50),
    ("50 - 60", 50, 60),
    ("60 - 70", 60, 70),
    ("70 - 80", 70, 80),
    ("80 - 90", 80, 90),
    ("> 90", 90, 120),
];

/// Character expected screen time buckets (minutes).
pub const SCREEN_TIME_BUCKETS: &[Bucket] = &[
    ("< 5 min", 0, 5),
    ("5 - 10 min", 5, 10),
    ("10 - 20 min", 10, 20),
    ("20 - 40 min", 20, 40),
    ("40 - 80 min", 40, 80),
    ("> 80 min", 80, 300),
];

/// Scene expected length buckets (minutes).
pub const SCENE_LENGTH_BUCKETS: &[Bucket] = &[
    ("< 1 min", 0, 1),
    ("1 - 3 min", 1, 3),
    ("3 - 5 min", 3, 5),
    ("5 - 10 min", 5, 10),
    ("10 - 20 min", 10, 20),
    ("> 20 min", 20, 120),
];

/// Montage sequence length buckets (seconds).
pub const MONTAGE_LENGTH_BUCKETS: &[Bucket] = &[
    ("< 10 seconds", 0, 10),
    ("10 - 20 seconds", 10, 20),
    ("20 - 30 seconds", 20, 30),
    ("30 - 40 seconds", 30, 40),
    ("40 - 50 seconds", 40, 50),
    ("> 50 seconds", 50, 6000),
];

/// Number-of-extras buckets shared by scenes and montages.
pub const EXTRAS_BUCKETS: &[Bucket] = &[
    ("< 5", 0, 5),
    ("5 - 10", 5, 10),
    ("10 - 20", 10, 20),
    ("20 - 40", 20, 40),
    ("40 - 80", 40, 80),
    ("> 80", 80, 10000),
];

/// Look up a bucket by its label.
pub fn bucket(table: &[Bucket], label: &str) -> Option<ValueRange> {
    table
        .iter()
        .find(|(l, _, _)| *l == label)
        .map(|&(_, min, max)| ValueRange { min, max })
}

// ---------------------------------------------------------------------------
// Filters and criteria
// ---------------------------------------------------------------------------

/// Entity family a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchEntity {
    Movies,
    Characters,
    Scenes,
    Montages,
}

/// One `{field, value}` pair from the search screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieCriteria {
    pub name: Option<String>,
    pub logline: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterCriteria {
    pub movie: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub gender: Option<Gender>,
    /// Overlaps the character's `[lower_age, upper_age]`.
    pub age: Option<ValueRange>,
    pub character_type: Option<CharacterType>,
    pub screen_time: Option<ValueRange>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneCriteria {
    pub movie: Option<String>,
    /// Matches scenes featuring a character whose name contains the term.
    pub character: Option<String>,
    /// Substring of the scene number rendered as text.
    pub number: Option<String>,
    pub description: Option<String>,
    pub act: Option<String>,
    pub ie_flag: Option<InteriorExterior>,
    pub sl_flag: Option<SetLocation>,
    pub scene_type: Option<SceneType>,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub weather: Option<String>,
    pub time: Option<String>,
    pub length: Option<ValueRange>,
    pub extras: Option<ValueRange>,
    pub relevance: Option<Relevance>,
    pub cost: Option<Cost>,
    /// Matches any of the six note columns.
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MontageCriteria {
    pub movie: Option<String>,
    pub scene_number: Option<String>,
    pub description: Option<String>,
    pub ie_flag: Option<InteriorExterior>,
    pub sl_flag: Option<SetLocation>,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub weather: Option<String>,
    pub time: Option<String>,
    pub length: Option<ValueRange>,
    pub extras: Option<ValueRange>,
    pub notes: Option<String>,
}

/// Typed criteria for one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    Movies(MovieCriteria),
    Characters(CharacterCriteria),
    Scenes(SceneCriteria),
    Montages(MontageCriteria),
}

fn unsupported(entity: SearchEntity, field: &str) -> CoreError {
    CoreError::Validation(format!("Unsupported field for {entity:?}: {field}"))
}

/// Overwrite `slot` only when `value` resolved to something.
///
/// Unknown labels and bucket names leave the criterion unset; a later
/// filter on the same field replaces an earlier one.
fn set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Translate label filters into typed criteria.
///
/// Filters with blank values are skipped. A field name the entity does not
/// support is a validation error.
pub fn build_criteria(
    entity: SearchEntity,
    filters: &[FieldFilter],
) -> Result<SearchCriteria, CoreError> {
    let active = filters.iter().filter(|f| !f.value.trim().is_empty());

    match entity {
        SearchEntity::Movies => {
            let mut c = MovieCriteria::default();
            for f in active {
                let pattern = contains_pattern(&f.value);
                match f.field.as_str() {
                    "Name" => set(&mut c.name, pattern),
                    "Logline" => set(&mut c.logline, pattern),
                    "Description" => set(&mut c.description, pattern),
                    other => return Err(unsupported(entity, other)),
                }
            }
            Ok(SearchCriteria::Movies(c))
        }
        SearchEntity::Characters => {
            let mut c = CharacterCriteria::default();
            for f in active {
                let value = f.value.trim();
                let pattern = contains_pattern(value);
                match f.field.as_str() {
                    "Movie" => set(&mut c.movie, pattern),
                    "Name" => set(&mut c.name, pattern),
                    "Description" => set(&mut c.description, pattern),
                    "Gender" => set(&mut c.gender, Gender::from_label(value)),
                    "Age" => set(&mut c.age, bucket(AGE_BUCKETS, value)),
                    "Type" => set(&mut c.character_type, CharacterType::from_label(value)),
                    "Screen Time" => set(&mut c.screen_time, bucket(SCREEN_TIME_BUCKETS, value)),
                    "Notes" => set(&mut c.notes, pattern),
                    other => return Err(unsupported(entity, other)),
                }
            }
            Ok(SearchCriteria::Characters(c))
        }
        SearchEntity::Scenes => {
            let mut c = SceneCriteria::default();
            for f in active {
                let value = f.value.trim();
                let pattern = contains_pattern(value);
                match f.field.as_str() {
                    "Movie" => set(&mut c.movie, pattern),
                    "Character" => set(&mut c.character, pattern),
                    "Number" => set(&mut c.number, pattern),
                    "Description" => set(&mut c.description, pattern),
                    "Act" => set(&mut c.act, pattern),
                    "Int Ext" => set(&mut c.ie_flag, InteriorExterior::from_label(value)),
                    "Set Loc" => set(&mut c.sl_flag, SetLocation::from_label(value)),
                    "Type" => set(&mut c.scene_type, SceneType::from_label(value)),
                    "Location" => set(&mut c.location, pattern),
                    "Sublocation" => set(&mut c.sub_location, pattern),
                    "Weather" => set(&mut c.weather, pattern),
                    "Time" => set(&mut c.time, pattern),
                    "Length" => set(&mut c.length, bucket(SCENE_LENGTH_BUCKETS, value)),
                    "Extras" => set(&mut c.extras, bucket(EXTRAS_BUCKETS, value)),
                    "Relevance" => set(&mut c.relevance, Relevance::from_label(value)),
                    "Cost" => set(&mut c.cost, Cost::from_label(value)),
                    "Notes" => set(&mut c.notes, pattern),
                    other => return Err(unsupported(entity, other)),
                }
            }
            Ok(SearchCriteria::Scenes(c))
        }
        SearchEntity::Montages => {
            let mut c = MontageCriteria::default();
            for f in active {
                let value = f.value.trim();
                let pattern = contains_pattern(value);
                match f.field.as_str() {
                    "Movie" => set(&mut c.movie, pattern),
                    "Scene Number" => set(&mut c.scene_number, pattern),
                    "Description" => set(&mut c.description, pattern),
                    "Int Ext" => set(&mut c.ie_flag, InteriorExterior::from_label(value)),
                    "Set Loc" => set(&mut c.sl_flag, SetLocation::from_label(value)),
                    "Location" => set(&mut c.location, pattern),
                    "Sublocation" => set(&mut c.sub_location, pattern),
                    "Weather" => set(&mut c.weather, pattern),
                    "Time" => set(&mut c.time, pattern),
                    "Length" => set(&mut c.length, bucket(MONTAGE_LENGTH_BUCKETS, value)),
                    "Extras" => set(&mut c.extras, bucket(EXTRAS_BUCKETS, value)),
                    "Notes" => set(&mut c.notes, pattern),
                    other => return Err(unsupported(entity, other)),
                }
            }
            Ok(SearchCriteria::Montages(c))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn filter(field: &str, value: &str) -> FieldFilter {
        FieldFilter {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    // -- pagination ----------------------------------------------------------

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(None, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 5);
        assert_eq!(clamp_limit(Some(0), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 1);
        assert_eq!(clamp_limit(Some(500), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 100);
    }

    #[test]
    fn page_offset_is_one_based() {
        assert_eq!(page_offset(clamp_page(None), 5), 0);
        assert_eq!(page_offset(clamp_page(Some(3)), 5), 10);
        assert_eq!(page_offset(clamp_page(Some(-2)), 5), 0);
    }

    #[test]
    fn page_offset_saturates_instead_of_overflowing() {
        assert_eq!(page_offset(i64::MAX, MAX_PAGE_SIZE), i64::MAX);
    }

    // -- contains_pattern ----------------------------------------------------

    #[test]
    fn pattern_wraps_and_escapes() {
        assert_eq!(contains_pattern(" rain "), Some("%rain%".to_string()));
        assert_eq!(contains_pattern("50%_off"), Some("%50\\%\\_off%".to_string()));
        assert_eq!(contains_pattern("  "), None);
    }

    // -- build_criteria ------------------------------------------------------

    #[test]
    fn movie_filters_become_patterns() {
        let criteria =
            build_criteria(SearchEntity::Movies, &[filter("Name", "Last"), filter("Logline", "")])
                .unwrap();
        assert_eq!(
            criteria,
            SearchCriteria::Movies(MovieCriteria {
                name: Some("%Last%".to_string()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn character_labels_and_buckets_resolve() {
        let criteria = build_criteria(
            SearchEntity::Characters,
            &[
                filter("Gender", "Female"),
                filter("Type", "Main"),
                filter("Age", "> 90"),
                filter("Screen Time", "5 - 10 min"),
            ],
        )
        .unwrap();
        let SearchCriteria::Characters(c) = criteria else {
            panic!("expected character criteria");
        };
        assert_eq!(c.gender, Some(Gender::Female));
        assert_eq!(c.character_type, Some(CharacterType::Main));
        assert_eq!(c.age, Some(ValueRange { min: 90, max: 120 }));
        assert_eq!(c.screen_time, Some(ValueRange { min: 5, max: 10 }));
    }

    #[test]
    fn scene_labels_map_to_codes() {
        let criteria = build_criteria(
            SearchEntity::Scenes,
            &[
                filter("Int Ext", "INT./EXT."),
                filter("Set Loc", "Set/Location"),
                filter("Type", "Balanced"),
                filter("Relevance", "Must-have"),
                filter("Cost", "Reasonably-expensive"),
                filter("Extras", "> 80"),
            ],
        )
        .unwrap();
        let SearchCriteria::Scenes(c) = criteria else {
            panic!("expected scene criteria");
        };
        assert_eq!(c.ie_flag.map(InteriorExterior::code), Some("IE"));
        assert_eq!(c.sl_flag.map(SetLocation::code), Some("SL"));
        assert_eq!(c.scene_type.map(SceneType::code), Some("B"));
        assert_eq!(c.relevance.map(Relevance::code), Some("M"));
        assert_eq!(c.cost.map(Cost::code), Some("R"));
        assert_eq!(c.extras, Some(ValueRange { min: 80, max: 10000 }));
    }

    #[test]
    fn montage_length_uses_seconds_buckets() {
        let criteria =
            build_criteria(SearchEntity::Montages, &[filter("Length", "> 50 seconds")]).unwrap();
        let SearchCriteria::Montages(c) = criteria else {
            panic!("expected montage criteria");
        };
        assert_eq!(c.length, Some(ValueRange { min: 50, max: 6000 }));
    }

    #[test]
    fn unknown_label_is_ignored() {
        let criteria =
            build_criteria(SearchEntity::Characters, &[filter("Gender", "Robot")]).unwrap();
        assert_eq!(criteria, SearchCriteria::Characters(CharacterCriteria::default()));
    }

    #[test]
    fn later_filter_on_same_field_wins() {
        let criteria = build_criteria(
            SearchEntity::Movies,
            &[filter("Name", "first"), filter("Name", "second")],
        )
        .unwrap();
        let SearchCriteria::Movies(c) = criteria else {
            panic!("expected movie criteria");
        };
        assert_eq!(c.name.as_deref(), Some("%second%"));
    }

    #[test]
    fn unsupported_field_is_rejected() {
        assert_matches!(
            build_criteria(SearchEntity::Montages, &[filter("Character", "Maya")]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn blank_unsupported_field_is_skipped() {
        assert!(build_criteria(SearchEntity::Movies, &[filter("Budget", " ")]).is_ok());
    }
}
