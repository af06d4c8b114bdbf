//! Incremental card filtering
//!
//! Titles are captured once and lowercased up front. Filtering produces a
//! [`FilterPlan`]: which cards to show and whether the "no results" state
//! applies. Applying the plan to the page is the component's job.

use std::time::Duration;

/// Normalizes raw input into a query: trimmed and lowercased
///
/// Whitespace-only input normalizes to the empty query.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Animation delay for the card at `index` so that cards fade in one after another
pub fn stagger_delay(index: usize, step: Duration) -> Duration {
    step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Searchable titles of a fixed card collection, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardIndex {
    titles: Vec<String>,
}

impl CardIndex {
    /// Builds the index from raw titles; matching is case-insensitive
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            titles: titles
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Computes card visibility for an already normalized query
    ///
    /// A card is shown when the query is empty or its title contains the
    /// query as a substring.
    pub fn plan(&self, query: &str) -> FilterPlan {
        let visible = self
            .titles
            .iter()
            .map(|title| query.is_empty() || title.contains(query))
            .collect();

        FilterPlan {
            query: query.to_string(),
            visible,
        }
    }
}

/// Result of filtering the card index with one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPlan {
    query: String,
    visible: Vec<bool>,
}

impl FilterPlan {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Per-card visibility, in index order
    pub fn visibility(&self) -> &[bool] {
        &self.visible
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|shown| **shown).count()
    }

    /// True when a non-empty query matched nothing
    pub fn is_empty_result(&self) -> bool {
        !self.query.is_empty() && self.visible_count() == 0
    }

    /// Message echoed by the "no results" indicator
    pub fn no_results_message(&self) -> String {
        format!("No items found for \"{}\"", self.query)
    }
}
