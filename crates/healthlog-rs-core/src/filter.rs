//! Search and category filtering over the record collection.
//!
//! Matching is substring-based on every searchable field, including the
//! numeric ones rendered as decimal strings, so `7` matches a heart rate of
//! 70 as well as 170. Only the category name is compared case-insensitively.

use crate::model::{Category, HealthRecord};
use std::collections::BTreeSet;

/// Current search text and selected categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub search: String,
    pub categories: BTreeSet<Category>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style search text setter.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Builder-style category selection.
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    /// Select the category if unselected, unselect it otherwise.
    pub fn toggle_category(&mut self, category: Category) {
        if !self.categories.remove(&category) {
            self.categories.insert(category);
        }
    }

    pub fn is_selected(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Whether the filter lets every record through.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.categories.is_empty()
    }

    /// Visible records in collection order.
    pub fn apply<'a>(&self, records: &'a [HealthRecord]) -> Vec<&'a HealthRecord> {
        filter_records(records, &self.search, &self.categories)
    }

    /// Whether a single record is visible.
    pub fn matches(&self, record: &HealthRecord) -> bool {
        category_selected(record, &self.categories) && search_matches(record, &self.search)
    }
}

/// Records passing both the category and the search predicate, in order.
pub fn filter_records<'a>(
    records: &'a [HealthRecord],
    search: &str,
    categories: &BTreeSet<Category>,
) -> Vec<&'a HealthRecord> {
    records
        .iter()
        .filter(|record| category_selected(record, categories))
        .filter(|record| search_matches(record, search))
        .collect()
}

fn category_selected(record: &HealthRecord, categories: &BTreeSet<Category>) -> bool {
    categories.is_empty() || categories.contains(&record.category)
}

fn search_matches(record: &HealthRecord, search: &str) -> bool {
    record.date.contains(search)
        || record
            .category
            .as_str()
            .to_lowercase()
            .contains(&search.to_lowercase())
        || record.temperature.to_string().contains(search)
        || record.blood_pressure.contains(search)
        || record.heart_rate.to_string().contains(search)
}
