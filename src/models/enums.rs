use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(PayloadCategory {
    Batch => "batch",
    Product => "product",
    RecyclingCenter => "recycling-center",
    Profile => "profile",
    Url => "url",
    Text => "text",
    Unknown => "unknown",
});

// Toast severities. `Caution` extends the toast layer's normal/destructive
// pair and is raised only when an external link is refused.
str_enum!(Severity {
    Normal => "normal",
    Caution => "caution",
    Destructive => "destructive",
});

str_enum!(PlasticType {
    Pet => "pet",
    Hdpe => "hdpe",
    Pvc => "pvc",
    Ldpe => "ldpe",
    Pp => "pp",
    Ps => "ps",
    Other => "other",
});

str_enum!(BatchStatus {
    Collected => "collected",
    Sorted => "sorted",
    Processed => "processed",
    Recycled => "recycled",
});
