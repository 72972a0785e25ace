//! Filter and sort settings for list post-processing.

use super::StatusBucket;
use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Parses `asc` / `desc` (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// How a list of records is filtered, searched and ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Status bucket records must belong to.
    pub bucket: StatusBucket,
    /// Free-text search terms; a record matches if any term does.
    #[serde(default)]
    pub search: Vec<String>,
    /// Record key to sort by.
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl FilterSpec {
    /// Creates a spec for `bucket` with no search and input order.
    #[must_use]
    pub fn new(bucket: StatusBucket) -> Self {
        Self {
            bucket,
            search: Vec::new(),
            sort_by: None,
            direction: SortDirection::default(),
        }
    }

    /// Adds search terms. Blank terms are ignored.
    #[must_use]
    pub fn with_search<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search.extend(
            terms
                .into_iter()
                .map(Into::into)
                .map(|t: String| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        );
        self
    }

    /// Sets the sort key and direction.
    #[must_use]
    pub fn with_sort(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(key.into());
        self.direction = direction;
        self
    }
}
