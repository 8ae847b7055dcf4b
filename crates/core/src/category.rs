//! The closed set of article categories and the feed's filter selection.

use crate::constants::ALL_LABEL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An article category. The set is closed; names match exactly and are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Design,
    Business,
    Lifestyle,
    Travel,
}

impl Category {
    /// Every category, in the order the filter control lists them.
    pub const ALL: [Category; 5] = [
        Category::Technology,
        Category::Design,
        Category::Business,
        Category::Lifestyle,
        Category::Travel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Design => "Design",
            Category::Business => "Business",
            Category::Lifestyle => "Lifestyle",
            Category::Travel => "Travel",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// The feed's active filter: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterSelection {
    #[default]
    All,
    Only(Category),
}

impl FilterSelection {
    /// Normalise a raw value into a selection.
    ///
    /// Absent, `"All"` and unrecognised values all map to [`FilterSelection::All`].
    pub fn parse_or_all(raw: Option<&str>) -> Self {
        match raw {
            Some(value) => match value.parse::<Category>() {
                Ok(category) => FilterSelection::Only(category),
                Err(_) => {
                    if value != ALL_LABEL {
                        tracing::debug!("unrecognised category {:?}, showing all", value);
                    }
                    FilterSelection::All
                }
            },
            None => FilterSelection::All,
        }
    }

    /// Every selectable option: the sentinel first, then each category.
    pub fn options() -> impl Iterator<Item = FilterSelection> {
        std::iter::once(FilterSelection::All).chain(Category::ALL.map(FilterSelection::Only))
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterSelection::All => ALL_LABEL,
            FilterSelection::Only(category) => category.as_str(),
        }
    }

    pub fn category(self) -> Option<Category> {
        match self {
            FilterSelection::All => None,
            FilterSelection::Only(category) => Some(category),
        }
    }

    pub fn is_all(self) -> bool {
        self == FilterSelection::All
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
