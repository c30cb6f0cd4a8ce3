//! Short-code enumerations stored on breakdown rows.
//!
//! Rows keep the raw code string (`"M"`, `"IE"`, ...). These enums are the
//! closed set of legal codes plus the human-readable labels that search
//! filters and listings use.

macro_rules! define_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Code persisted in the database.
            pub fn code(self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            /// Display label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $( $label => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Parse a code after trimming, with a message listing the allowed codes.
            pub fn parse_code(code: &str) -> Result<Self, String> {
                Self::from_code(code.trim()).ok_or_else(|| {
                    let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.code()).collect();
                    format!(
                        "Invalid {} '{}'. Allowed values: {}",
                        $field,
                        code.trim(),
                        allowed.join(", ")
                    )
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

define_code_enum! {
    /// Character gender.
    Gender ("gender") {
        Male = ("M", "Male"),
        Female = ("F", "Female"),
        Other = ("O", "Other"),
    }
}

define_code_enum! {
    /// Character importance. Declaration order is the listing rank.
    CharacterType ("character type") {
        Main = ("M", "Main"),
        Primary = ("P", "Primary"),
        Secondary = ("S", "Secondary"),
        Tertiary = ("T", "Tertiary"),
        Other = ("O", "Other"),
    }
}

define_code_enum! {
    /// Interior / exterior slug-line flag.
    InteriorExterior ("int/ext flag") {
        Interior = ("I", "INT."),
        Exterior = ("E", "EXT."),
        Both = ("IE", "INT./EXT."),
    }
}

define_code_enum! {
    /// Shot on a built set, on location, or both.
    SetLocation ("set/location flag") {
        Set = ("S", "Set"),
        Location = ("L", "Location"),
        Both = ("SL", "Set/Location"),
    }
}

define_code_enum! {
    SceneType ("scene type") {
        Montage = ("M", "Montage"),
        Dialogue = ("D", "Dialogue"),
        Action = ("A", "Action"),
        Title = ("T", "Title"),
        Stunt = ("S", "Stunt"),
        Graphical = ("G", "Graphical"),
        Others = ("O", "Others"),
        Balanced = ("B", "Balanced"),
    }
}

define_code_enum! {
    /// How much a scene matters to the story.
    Relevance ("relevance") {
        MustHave = ("M", "Must-have"),
        GoodToHave = ("G", "Good-to-have"),
        Filler = ("F", "Filler"),
        ValueAddition = ("V", "Value-addition"),
        Unimportant = ("U", "Unimportant"),
    }
}

define_code_enum! {
    /// Estimated production cost of a scene.
    Cost ("cost") {
        ExtremelyExpensive = ("E", "Extremely-expensive"),
        VeryExpensive = ("V", "Very-expensive"),
        ModeratelyExpensive = ("M", "Moderately-expensive"),
        ReasonablyExpensive = ("R", "Reasonably-expensive"),
        Inexpensive = ("I", "Inexpensive"),
    }
}

define_code_enum! {
    /// How a character appears in a scene.
    AppearanceType ("role type") {
        Dialogue = ("D", "Dialogue"),
        NoDialogue = ("N", "No-Dialogue"),
        OffScreen = ("O", "Off-Screen"),
        Background = ("B", "Background"),
    }
}

define_code_enum! {
    /// Marks the user's default movie.
    DefaultFlag ("default flag") {
        Yes = ("Y", "Yes"),
        No = ("N", "No"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_and_label_tables_round_trip() {
        for v in SceneType::ALL {
            assert_eq!(SceneType::from_code(v.code()), Some(*v));
            assert_eq!(SceneType::from_label(v.label()), Some(*v));
        }
        for v in Cost::ALL {
            assert_eq!(Cost::from_label(v.label()), Some(*v));
        }
    }

    #[test]
    fn labels_match_filter_vocabulary() {
        assert_eq!(InteriorExterior::from_label("INT./EXT."), Some(InteriorExterior::Both));
        assert_eq!(SetLocation::from_label("Set/Location"), Some(SetLocation::Both));
        assert_eq!(Relevance::from_label("Value-addition"), Some(Relevance::ValueAddition));
        assert_eq!(Cost::from_label("Inexpensive").map(Cost::code), Some("I"));
        assert_eq!(AppearanceType::from_code("N"), Some(AppearanceType::NoDialogue));
    }

    #[test]
    fn parse_code_trims_input() {
        assert_eq!(Gender::parse_code(" F "), Ok(Gender::Female));
    }

    #[test]
    fn parse_code_lists_allowed_values() {
        let err = Gender::parse_code("X").unwrap_err();
        assert_eq!(err, "Invalid gender 'X'. Allowed values: M, F, O");
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert_eq!(SceneType::from_code("m"), None);
        assert_eq!(Gender::from_label("male"), None);
    }

    #[test]
    fn character_type_declaration_order_is_rank() {
        let codes: Vec<&str> = CharacterType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(codes, ["M", "P", "S", "T", "O"]);
    }
}
