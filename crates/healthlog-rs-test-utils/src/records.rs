use healthlog_rs_core::{Category, HealthRecord, NewHealthRecord, RecordId};

/// A valid, unsaved record for the given date.
pub fn new_record(date: &str) -> NewHealthRecord {
    NewHealthRecord {
        date: date.to_string(),
        category: Category::General,
        temperature: 36.5,
        blood_pressure: "120/80".to_string(),
        heart_rate: 70,
    }
}

/// A stored record with an explicit id.
pub fn stored_record(id: &str, date: &str, category: Category) -> HealthRecord {
    NewHealthRecord {
        category,
        ..new_record(date)
    }
    .with_id(RecordId::new(id))
}
