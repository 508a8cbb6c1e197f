//! Field validation for candidate records.
//!
//! [`validate`] checks a pre-typed [`RecordDraft`] and either returns the
//! normalized [`NewHealthRecord`] or one message per offending field. It never
//! panics on well-typed input; out-of-range values are reported, not raised.

use crate::model::{Category, NewHealthRecord};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Lowest accepted body temperature in °C.
pub const TEMPERATURE_MIN: f64 = 35.0;
/// Highest accepted body temperature in °C.
pub const TEMPERATURE_MAX: f64 = 42.0;
/// Lowest accepted heart rate in bpm.
pub const HEART_RATE_MIN: i64 = 40;
/// Highest accepted heart rate in bpm.
pub const HEART_RATE_MAX: i64 = 220;

const DATE_FORMAT: &str = "%Y-%m-%d";

static BLOOD_PRESSURE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2,3}/[0-9]{2,3}$").ok());

/// Record fields that can carry a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordField {
    Date,
    Category,
    Temperature,
    BloodPressure,
    HeartRate,
}

impl RecordField {
    /// Serialized field name.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordField::Date => "date",
            RecordField::Category => "category",
            RecordField::Temperature => "temperature",
            RecordField::BloodPressure => "bloodPressure",
            RecordField::HeartRate => "heartRate",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-indexed validation failures, at most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<RecordField, String>,
}

impl ValidationErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field. The first message for a field wins.
    pub fn insert(&mut self, field: RecordField, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Whether the given field failed.
    pub fn contains(&self, field: RecordField) -> bool {
        self.fields.contains_key(&field)
    }

    /// Failed fields and their messages in field order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordField, &str)> {
        self.fields
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merge another set, keeping existing messages on conflicts.
    pub fn extend(&mut self, other: ValidationErrors) {
        for (field, message) in other.fields {
            self.insert(field, message);
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Pre-typed candidate record as submitted by a form.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub date: String,
    pub category: Category,
    pub temperature: f64,
    pub blood_pressure: String,
    pub heart_rate: i64,
}

impl From<&NewHealthRecord> for RecordDraft {
    fn from(record: &NewHealthRecord) -> Self {
        Self {
            date: record.date.clone(),
            category: record.category,
            temperature: record.temperature,
            blood_pressure: record.blood_pressure.clone(),
            heart_rate: i64::from(record.heart_rate),
        }
    }
}

/// Validate a draft, returning the normalized record or per-field failures.
pub fn validate(draft: &RecordDraft) -> Result<NewHealthRecord, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let date = draft.date.trim();
    if date.is_empty() {
        errors.insert(RecordField::Date, "Date is required");
    } else if NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
        errors.insert(
            RecordField::Date,
            "Date must be a calendar date (YYYY-MM-DD)",
        );
    }

    if !temperature_in_range(draft.temperature) {
        errors.insert(
            RecordField::Temperature,
            "Temperature must be between 35°C and 42°C",
        );
    }

    let blood_pressure = draft.blood_pressure.trim();
    if !is_blood_pressure(blood_pressure) {
        errors.insert(
            RecordField::BloodPressure,
            "Blood pressure must be in the format 120/80",
        );
    }

    let heart_rate = u32::try_from(draft.heart_rate)
        .ok()
        .filter(|_| (HEART_RATE_MIN..=HEART_RATE_MAX).contains(&draft.heart_rate));
    if heart_rate.is_none() {
        errors.insert(
            RecordField::HeartRate,
            "Heart rate must be between 40 and 220 bpm",
        );
    }

    errors.into_result(NewHealthRecord {
        date: date.to_string(),
        category: draft.category,
        temperature: draft.temperature,
        blood_pressure: blood_pressure.to_string(),
        heart_rate: heart_rate.unwrap_or_default(),
    })
}

/// Whether a temperature lies in the accepted closed range. NaN never does.
pub fn temperature_in_range(value: f64) -> bool {
    (TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&value)
}

/// Whether a reading matches the `systolic/diastolic` pattern.
pub fn is_blood_pressure(value: &str) -> bool {
    BLOOD_PRESSURE_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::{RecordDraft, RecordField, validate};
    use crate::model::Category;
    use pretty_assertions::assert_eq;

    fn draft() -> RecordDraft {
        RecordDraft {
            date: "2024-01-01".to_string(),
            category: Category::General,
            temperature: 36.5,
            blood_pressure: "120/80".to_string(),
            heart_rate: 70,
        }
    }

    #[test]
    fn accepts_a_typical_record() {
        let record = validate(&draft()).expect("valid");
        assert_eq!(record.date, "2024-01-01");
        assert_eq!(record.heart_rate, 70);
        assert_eq!(record.category, Category::General);
    }

    #[test]
    fn temperature_boundaries() {
        for value in [35.0, 42.0] {
            let draft = RecordDraft {
                temperature: value,
                ..draft()
            };
            assert!(validate(&draft).is_ok(), "{value} should pass");
        }
        for value in [34.9, 42.1, f64::NAN] {
            let draft = RecordDraft {
                temperature: value,
                ..draft()
            };
            let errors = validate(&draft).expect_err("out of range");
            assert_eq!(
                errors.get(RecordField::Temperature),
                Some("Temperature must be between 35°C and 42°C")
            );
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn heart_rate_boundaries() {
        for value in [40, 220] {
            let draft = RecordDraft {
                heart_rate: value,
                ..draft()
            };
            assert_eq!(validate(&draft).expect("valid").heart_rate, value as u32);
        }
        for value in [39, 221, -70, i64::MAX] {
            let draft = RecordDraft {
                heart_rate: value,
                ..draft()
            };
            let errors = validate(&draft).expect_err("out of range");
            assert!(errors.contains(RecordField::HeartRate), "{value} should fail");
        }
    }

    #[test]
    fn blood_pressure_is_pattern_only() {
        for value in ["120/80", "999/999", "90/60"] {
            let draft = RecordDraft {
                blood_pressure: value.to_string(),
                ..draft()
            };
            assert!(validate(&draft).is_ok(), "{value} should pass");
        }
        for value in ["5/80", "120/8", "1200/80", "120-80", "", "١٢٠/٨٠"] {
            let draft = RecordDraft {
                blood_pressure: value.to_string(),
                ..draft()
            };
            let errors = validate(&draft).expect_err("bad pattern");
            assert_eq!(
                errors.get(RecordField::BloodPressure),
                Some("Blood pressure must be in the format 120/80")
            );
        }
    }

    #[test]
    fn date_must_be_present_and_calendar() {
        let missing = RecordDraft {
            date: "   ".to_string(),
            ..draft()
        };
        let errors = validate(&missing).expect_err("missing");
        assert_eq!(errors.get(RecordField::Date), Some("Date is required"));

        let bogus = RecordDraft {
            date: "2024-02-30".to_string(),
            ..draft()
        };
        let errors = validate(&bogus).expect_err("bogus");
        assert!(errors.contains(RecordField::Date));
    }

    #[test]
    fn reports_one_failure_per_offending_field() {
        let bad = RecordDraft {
            date: String::new(),
            category: Category::Illness,
            temperature: 50.0,
            blood_pressure: "high".to_string(),
            heart_rate: 10,
        };
        let original = bad.clone();
        let errors = validate(&bad).expect_err("invalid");
        let fields: Vec<RecordField> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec![
                RecordField::Date,
                RecordField::Temperature,
                RecordField::BloodPressure,
                RecordField::HeartRate,
            ]
        );
        assert_eq!(bad, original);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let padded = RecordDraft {
            date: " 2024-03-04 ".to_string(),
            blood_pressure: " 118/76\n".to_string(),
            ..draft()
        };
        let record = validate(&padded).expect("valid");
        assert_eq!(record.date, "2024-03-04");
        assert_eq!(record.blood_pressure, "118/76");
    }

    #[test]
    fn display_lists_fields_in_order() {
        let bad = RecordDraft {
            temperature: 20.0,
            heart_rate: 300,
            ..draft()
        };
        let errors = validate(&bad).expect_err("invalid");
        assert_eq!(
            errors.to_string(),
            "temperature: Temperature must be between 35°C and 42°C; heartRate: Heart rate must be between 40 and 220 bpm"
        );
    }
}
