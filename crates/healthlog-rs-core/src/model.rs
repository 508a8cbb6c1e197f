//! Health record model shared by the store, filters and presentation layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque record identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an existing identifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Closed classification tag for a record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    General,
    Exercise,
    Illness,
    Medication,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Exercise,
        Category::Illness,
        Category::Medication,
        Category::Other,
    ];

    /// Display name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Exercise => "Exercise",
            Category::Illness => "Illness",
            Category::Medication => "Medication",
            Category::Other => "Other",
        }
    }

    /// Next category in display order, wrapping around.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous category in display order, wrapping around.
    pub fn previous(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|category| *category == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a category name is not part of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Parse a category name, ignoring ASCII case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

/// A validated observation that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthRecord {
    /// Calendar date (`YYYY-MM-DD`).
    pub date: String,
    pub category: Category,
    /// Body temperature in degrees Celsius.
    pub temperature: f64,
    /// `systolic/diastolic` reading.
    pub blood_pressure: String,
    /// Beats per minute.
    pub heart_rate: u32,
}

impl NewHealthRecord {
    /// Attach an id, producing a stored record.
    pub fn with_id(self, id: RecordId) -> HealthRecord {
        HealthRecord {
            id,
            date: self.date,
            category: self.category,
            temperature: self.temperature,
            blood_pressure: self.blood_pressure,
            heart_rate: self.heart_rate,
        }
    }
}

/// Persisted health observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    /// Record identifier, immutable once assigned.
    pub id: RecordId,
    /// Calendar date (`YYYY-MM-DD`).
    pub date: String,
    pub category: Category,
    /// Body temperature in degrees Celsius.
    pub temperature: f64,
    /// `systolic/diastolic` reading.
    pub blood_pressure: String,
    /// Beats per minute.
    pub heart_rate: u32,
}

impl HealthRecord {
    /// Drop the id, e.g. to prefill an edit form.
    pub fn without_id(&self) -> NewHealthRecord {
        NewHealthRecord {
            date: self.date.clone(),
            category: self.category,
            temperature: self.temperature,
            blood_pressure: self.blood_pressure.clone(),
            heart_rate: self.heart_rate,
        }
    }
}
