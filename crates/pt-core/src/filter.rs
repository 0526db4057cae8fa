//! Category filter used by reports.

use std::fmt;

use serde::{Serialize, Serializer};

/// Which categories a report includes.
///
/// The raw integer encoding is `0` for all categories, `-1` for entries without
/// a category and any other value for exactly that category id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Uncategorized,
    Category(i64),
}

impl CategoryFilter {
    /// Raw value for the "no category" filter.
    pub const UNCATEGORIZED_ID: i64 = -1;

    /// Decodes the raw integer form.
    pub const fn from_raw(raw: i64) -> Self {
        match raw {
            0 => Self::All,
            Self::UNCATEGORIZED_ID => Self::Uncategorized,
            id => Self::Category(id),
        }
    }

    /// Encodes back to the raw integer form.
    pub const fn as_raw(&self) -> i64 {
        match self {
            Self::All => 0,
            Self::Uncategorized => Self::UNCATEGORIZED_ID,
            Self::Category(id) => *id,
        }
    }

    /// Whether an entry with the given category reference passes this filter.
    pub fn matches(&self, category_id: Option<i64>) -> bool {
        match self {
            Self::All => true,
            Self::Uncategorized => category_id.is_none(),
            Self::Category(id) => category_id == Some(*id),
        }
    }
}

impl From<i64> for CategoryFilter {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Uncategorized => write!(f, "none"),
            Self::Category(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_raw())
    }
}
