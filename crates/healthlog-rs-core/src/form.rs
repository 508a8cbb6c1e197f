//! Raw form input and its conversion into a typed draft.

use crate::model::{Category, HealthRecord, NewHealthRecord};
use crate::validate::{RecordDraft, RecordField, ValidationErrors, validate};

/// Raw, untyped field values as typed by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordForm {
    pub date: String,
    pub category: String,
    pub temperature: String,
    pub blood_pressure: String,
    pub heart_rate: String,
}

impl RecordForm {
    /// Form prefilled from an existing record, e.g. for editing.
    pub fn from_record(record: &HealthRecord) -> Self {
        Self::from_new(&record.without_id())
    }

    /// Form prefilled from record values.
    pub fn from_new(record: &NewHealthRecord) -> Self {
        Self {
            date: record.date.clone(),
            category: record.category.to_string(),
            temperature: record.temperature.to_string(),
            blood_pressure: record.blood_pressure.clone(),
            heart_rate: record.heart_rate.to_string(),
        }
    }

    /// Convert raw values into a typed draft.
    ///
    /// Values that cannot be typed at all are reported as field errors; range
    /// and pattern checks are left to [`validate`].
    pub fn parse(&self) -> Result<RecordDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let category = self.category.parse::<Category>().ok();
        if category.is_none() {
            errors.insert(RecordField::Category, "Please select a category.");
        }

        let temperature = self.temperature.trim().parse::<f64>().ok();
        if temperature.is_none() {
            errors.insert(RecordField::Temperature, "Temperature must be a number");
        }

        let heart_rate = self.heart_rate.trim().parse::<i64>().ok();
        if heart_rate.is_none() {
            errors.insert(RecordField::HeartRate, "Heart rate must be a whole number");
        }

        match (category, temperature, heart_rate) {
            (Some(category), Some(temperature), Some(heart_rate)) if errors.is_empty() => {
                Ok(RecordDraft {
                    date: self.date.clone(),
                    category,
                    temperature,
                    blood_pressure: self.blood_pressure.clone(),
                    heart_rate,
                })
            }
            _ => Err(errors),
        }
    }

    /// Parse and validate in one step.
    ///
    /// Type errors and range errors are merged so every field reports at most
    /// one message.
    pub fn submit(&self) -> Result<NewHealthRecord, ValidationErrors> {
        match self.parse() {
            Ok(draft) => validate(&draft),
            Err(mut errors) => {
                let fallback = RecordDraft {
                    date: self.date.clone(),
                    category: Category::default(),
                    temperature: crate::validate::TEMPERATURE_MIN,
                    blood_pressure: self.blood_pressure.clone(),
                    heart_rate: crate::validate::HEART_RATE_MIN,
                };
                if let Err(rest) = validate(&fallback) {
                    errors.extend(rest);
                }
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RecordForm;
    use crate::model::Category;
    use crate::validate::RecordField;
    use pretty_assertions::assert_eq;

    fn form() -> RecordForm {
        RecordForm {
            date: "2024-05-01".to_string(),
            category: "Exercise".to_string(),
            temperature: "37.2".to_string(),
            blood_pressure: "130/85".to_string(),
            heart_rate: "110".to_string(),
        }
    }

    #[test]
    fn parses_typed_values() {
        let draft = form().parse().expect("draft");
        assert_eq!(draft.category, Category::Exercise);
        assert_eq!(draft.temperature, 37.2);
        assert_eq!(draft.heart_rate, 110);
    }

    #[test]
    fn reports_untyped_values_per_field() {
        let bad = RecordForm {
            category: "Sleep".to_string(),
            temperature: "warm".to_string(),
            heart_rate: "72.5".to_string(),
            ..form()
        };
        let errors = bad.parse().expect_err("untyped");
        assert_eq!(
            errors.get(RecordField::Category),
            Some("Please select a category.")
        );
        assert_eq!(
            errors.get(RecordField::Temperature),
            Some("Temperature must be a number")
        );
        assert_eq!(
            errors.get(RecordField::HeartRate),
            Some("Heart rate must be a whole number")
        );
    }

    #[test]
    fn submit_merges_type_and_range_errors() {
        let bad = RecordForm {
            date: String::new(),
            heart_rate: "abc".to_string(),
            blood_pressure: "5/80".to_string(),
            ..form()
        };
        let errors = bad.submit().expect_err("invalid");
        assert_eq!(errors.get(RecordField::Date), Some("Date is required"));
        assert_eq!(
            errors.get(RecordField::HeartRate),
            Some("Heart rate must be a whole number")
        );
        assert!(errors.contains(RecordField::BloodPressure));
        assert!(!errors.contains(RecordField::Temperature));
    }

    #[test]
    fn round_trips_through_existing_record() {
        let record = form().submit().expect("valid");
        let again = RecordForm::from_new(&record).submit().expect("valid again");
        assert_eq!(again, record);
    }
}
