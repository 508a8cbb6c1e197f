//! Add/edit record dialog state.

use healthlog_rs_core::{
    Category, HealthRecord, NewHealthRecord, RecordField, RecordForm, RecordId, ValidationErrors,
};

/// Field order inside the dialog.
pub const FIELD_ORDER: [RecordField; 5] = [
    RecordField::Date,
    RecordField::Category,
    RecordField::Temperature,
    RecordField::BloodPressure,
    RecordField::HeartRate,
];

/// What submitting the dialog does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    /// Append a new record.
    Add,
    /// Replace the record with this id.
    Edit(RecordId),
}

/// Form dialog with per-field error messages.
#[derive(Debug, Clone)]
pub struct RecordDialog {
    pub mode: DialogMode,
    pub form: RecordForm,
    pub focus: usize,
    pub errors: ValidationErrors,
}

impl RecordDialog {
    /// Dialog for a new record, prefilled with defaults.
    pub fn add(defaults: &NewHealthRecord) -> Self {
        Self {
            mode: DialogMode::Add,
            form: RecordForm::from_new(defaults),
            focus: 0,
            errors: ValidationErrors::new(),
        }
    }

    /// Dialog editing an existing record.
    pub fn edit(record: &HealthRecord) -> Self {
        Self {
            mode: DialogMode::Edit(record.id.clone()),
            form: RecordForm::from_record(record),
            focus: 0,
            errors: ValidationErrors::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Add => "Add New Health Record",
            DialogMode::Edit(_) => "Health Record Details",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            DialogMode::Add => "Add Record",
            DialogMode::Edit(_) => "Update Record",
        }
    }

    pub fn focused_field(&self) -> RecordField {
        FIELD_ORDER[self.focus % FIELD_ORDER.len()]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FIELD_ORDER.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + FIELD_ORDER.len() - 1) % FIELD_ORDER.len();
    }

    /// Current text of a field.
    pub fn value(&self, field: RecordField) -> &str {
        match field {
            RecordField::Date => &self.form.date,
            RecordField::Category => &self.form.category,
            RecordField::Temperature => &self.form.temperature,
            RecordField::BloodPressure => &self.form.blood_pressure,
            RecordField::HeartRate => &self.form.heart_rate,
        }
    }

    /// Type a character into the focused field. Category is cycled, not typed.
    pub fn push_char(&mut self, ch: char) {
        if let Some(value) = self.focused_text_mut() {
            value.push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(value) = self.focused_text_mut() {
            value.pop();
        }
    }

    /// Step the category forward or backward when it has focus.
    pub fn cycle_category(&mut self, forward: bool) {
        if self.focused_field() != RecordField::Category {
            return;
        }
        let current = self.form.category.parse::<Category>().unwrap_or_default();
        let next = if forward {
            current.next()
        } else {
            current.previous()
        };
        self.form.category = next.to_string();
    }

    /// Validate the form, keeping per-field messages on failure.
    pub fn submit(&mut self) -> Option<NewHealthRecord> {
        match self.form.submit() {
            Ok(record) => {
                self.errors = ValidationErrors::new();
                Some(record)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focused_field() {
            RecordField::Date => Some(&mut self.form.date),
            RecordField::Category => None,
            RecordField::Temperature => Some(&mut self.form.temperature),
            RecordField::BloodPressure => Some(&mut self.form.blood_pressure),
            RecordField::HeartRate => Some(&mut self.form.heart_rate),
        }
    }
}

/// Field label shown in the dialog and table header.
pub fn field_label(field: RecordField) -> &'static str {
    match field {
        RecordField::Date => "Date",
        RecordField::Category => "Category",
        RecordField::Temperature => "Temperature (°C)",
        RecordField::BloodPressure => "Blood Pressure",
        RecordField::HeartRate => "Heart Rate (bpm)",
    }
}

#[cfg(test)]
mod tests {
    use super::{DialogMode, RecordDialog};
    use healthlog_rs_core::{Category, NewHealthRecord, RecordField};
    use pretty_assertions::assert_eq;

    fn defaults() -> NewHealthRecord {
        NewHealthRecord {
            date: String::new(),
            category: Category::General,
            temperature: 36.5,
            blood_pressure: String::new(),
            heart_rate: 70,
        }
    }

    #[test]
    fn add_dialog_starts_with_defaults() {
        let dialog = RecordDialog::add(&defaults());
        assert_eq!(dialog.mode, DialogMode::Add);
        assert_eq!(dialog.value(RecordField::Temperature), "36.5");
        assert_eq!(dialog.value(RecordField::HeartRate), "70");
        assert_eq!(dialog.value(RecordField::Category), "General");
    }

    #[test]
    fn typing_edits_only_text_fields() {
        let mut dialog = RecordDialog::add(&defaults());
        for ch in "2024-01-01".chars() {
            dialog.push_char(ch);
        }
        dialog.focus_next();
        dialog.push_char('x');
        dialog.cycle_category(true);
        assert_eq!(dialog.value(RecordField::Date), "2024-01-01");
        assert_eq!(dialog.value(RecordField::Category), "Exercise");

        dialog.focus_previous();
        dialog.pop_char();
        assert_eq!(dialog.value(RecordField::Date), "2024-01-0");
    }

    #[test]
    fn failed_submit_keeps_field_errors() {
        let mut dialog = RecordDialog::add(&defaults());
        assert!(dialog.submit().is_none());
        assert_eq!(dialog.errors.get(RecordField::Date), Some("Date is required"));
        assert!(dialog.errors.contains(RecordField::BloodPressure));

        dialog.form.date = "2024-01-01".to_string();
        dialog.form.blood_pressure = "120/80".to_string();
        let record = dialog.submit().expect("valid");
        assert_eq!(record.heart_rate, 70);
        assert!(dialog.errors.is_empty());
    }
}
