//! Application state for the Healthlog TUI.

use crate::TuiConfig;
use crate::dialog::{DialogMode, RecordDialog};
use healthlog_rs_config::UserConfig;
use healthlog_rs_core::{
    Category, HealthRecord, IdGenerator, NewHealthRecord, RecordFilter, RecordStorage,
    RecordStore, StoreError, TrendSeries,
};
use log::{debug, info, warn};

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Records,
    Charts,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Records, Tab::Charts];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Records => "Records",
            Tab::Charts => "Charts",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Records => Tab::Charts,
            Tab::Charts => Tab::Records,
        }
    }
}

/// Top-level application state for the TUI.
pub struct App<S, G> {
    /// Record collection and its persistence slot.
    pub store: RecordStore<S, G>,
    /// Active tab.
    pub tab: Tab,
    /// Search text and selected categories.
    pub filter: RecordFilter,
    /// Whether keystrokes go to the search box.
    pub search_focused: bool,
    /// Index of the selected row among the visible records.
    pub selected: usize,
    /// Open add/edit dialog, if any.
    pub dialog: Option<RecordDialog>,
    /// Status line text.
    pub status: String,
    /// Placeholder profile shown in the header.
    pub user: UserConfig,
    /// Where records are stored, shown in the header.
    pub storage_label: String,
    form_defaults: NewHealthRecord,
}

impl<S: RecordStorage, G: IdGenerator> App<S, G> {
    pub fn new(store: RecordStore<S, G>, config: &TuiConfig) -> Self {
        let status = format!("loaded {} records", store.len());
        Self {
            store,
            tab: Tab::Records,
            filter: RecordFilter::new(),
            search_focused: false,
            selected: 0,
            dialog: None,
            status,
            user: config.user.clone(),
            storage_label: config.storage_label.clone(),
            form_defaults: config.form.blank_record(),
        }
    }

    /// Records passing the current filter, in collection order.
    pub fn visible(&self) -> Vec<&HealthRecord> {
        self.filter.apply(self.store.list())
    }

    pub fn selected_record(&self) -> Option<&HealthRecord> {
        self.visible().get(self.selected).copied()
    }

    /// Trend series over the whole collection, independent of the filter.
    pub fn trend(&self) -> TrendSeries {
        TrendSeries::from_records(self.store.list())
    }

    pub fn push_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Toggle the category at a 1-based position in [`Category::ALL`].
    pub fn toggle_category_at(&mut self, position: usize) {
        let Some(category) = position
            .checked_sub(1)
            .and_then(|idx| Category::ALL.get(idx))
        else {
            return;
        };
        self.filter.toggle_category(*category);
        self.clamp_selection();
        debug!(
            "toggled category filter (category={}, selected={})",
            category,
            self.filter.is_selected(*category)
        );
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.filter.search.push(ch);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.filter.search.pop();
        self.selected = 0;
    }

    pub fn open_add_dialog(&mut self) {
        self.dialog = Some(RecordDialog::add(&self.form_defaults));
    }

    /// Open the edit dialog for the selected record, if there is one.
    pub fn open_edit_dialog(&mut self) {
        let dialog = self.selected_record().map(RecordDialog::edit);
        if dialog.is_some() {
            self.dialog = dialog;
        }
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Validate the open dialog and apply it to the store.
    ///
    /// An invalid form stays open with its field errors.
    pub fn submit_dialog(&mut self) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let Some(record) = dialog.submit() else {
            debug!("dialog submission blocked (errors={})", dialog.errors.len());
            self.push_status("fix the highlighted fields");
            return;
        };
        let mode = dialog.mode.clone();
        self.dialog = None;

        match mode {
            DialogMode::Add => {
                let result = self.store.add(record);
                match result {
                    Ok(added) => {
                        info!("added record from dialog (id={})", added.id);
                        self.push_status(format!("added record {}", added.id));
                    }
                    Err(err) => self.report_save_error(err),
                }
            }
            DialogMode::Edit(id) => {
                let result = self.store.update(record.with_id(id.clone()));
                match result {
                    Ok(true) => self.push_status(format!("updated record {id}")),
                    Ok(false) => self.push_status(format!("record {id} no longer exists")),
                    Err(err) => self.report_save_error(err),
                }
            }
        }
        self.clamp_selection();
    }

    /// Remove the selected record.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_record().map(|record| record.id.clone()) else {
            return;
        };
        match self.store.delete(&id) {
            Ok(_) => self.push_status(format!("deleted record {id}")),
            Err(err) => self.report_save_error(err),
        }
        self.clamp_selection();
    }

    fn report_save_error(&mut self, err: StoreError) {
        warn!("record change not persisted (err={err})");
        self.push_status(format!("failed to save records: {err}"));
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::{App, Tab};
    use crate::TuiConfig;
    use healthlog_rs_core::{
        Category, MemoryStorage, RecordField, RecordStore, SequentialIdGenerator,
    };
    use healthlog_rs_test_utils::{FailingStorage, new_record};
    use pretty_assertions::assert_eq;

    fn app() -> App<MemoryStorage, SequentialIdGenerator> {
        let mut store = RecordStore::open(MemoryStorage::new(), SequentialIdGenerator::default());
        store.add(new_record("2024-01-01")).expect("add");
        let mut exercise = new_record("2024-01-02");
        exercise.category = Category::Exercise;
        exercise.heart_rate = 150;
        store.add(exercise).expect("add");
        store.add(new_record("2024-02-01")).expect("add");
        App::new(store, &TuiConfig::default())
    }

    #[test]
    fn category_toggle_narrows_visible_rows() {
        let mut app = app();
        app.selected = 2;
        app.toggle_category_at(2);
        let dates: Vec<&str> = app.visible().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-02"]);
        assert_eq!(app.selected, 0);

        app.toggle_category_at(2);
        assert_eq!(app.visible().len(), 3);
        app.toggle_category_at(9);
        assert_eq!(app.visible().len(), 3);
    }

    #[test]
    fn search_filters_and_resets_selection() {
        let mut app = app();
        app.select_next();
        for ch in "2024-01".chars() {
            app.push_search_char(ch);
        }
        assert_eq!(app.selected, 0);
        assert_eq!(app.visible().len(), 2);
        app.pop_search_char();
        assert_eq!(app.filter.search, "2024-0");
    }

    #[test]
    fn selection_stays_within_visible_rows() {
        let mut app = app();
        app.select_previous();
        assert_eq!(app.selected, 0);
        for _ in 0..5 {
            app.select_next();
        }
        assert_eq!(app.selected, 2);
        assert_eq!(
            app.selected_record().map(|r| r.date.as_str()),
            Some("2024-02-01")
        );
    }

    #[test]
    fn add_dialog_appends_valid_record() {
        let mut app = app();
        app.open_add_dialog();
        let dialog = app.dialog.as_mut().expect("dialog");
        dialog.form.date = "2024-03-01".to_string();
        dialog.form.blood_pressure = "118/76".to_string();

        app.submit_dialog();

        assert!(app.dialog.is_none());
        assert_eq!(app.store.len(), 4);
        assert_eq!(app.status, "added record 4");
    }

    #[test]
    fn invalid_dialog_stays_open() {
        let mut app = app();
        app.open_add_dialog();
        app.submit_dialog();

        let dialog = app.dialog.as_ref().expect("dialog");
        assert!(dialog.errors.contains(RecordField::Date));
        assert_eq!(app.store.len(), 3);
    }

    #[test]
    fn edit_dialog_updates_selected_record() {
        let mut app = app();
        app.select_next();
        app.open_edit_dialog();
        app.dialog.as_mut().expect("dialog").form.temperature = "38.2".to_string();

        app.submit_dialog();

        assert_eq!(app.store.len(), 3);
        assert_eq!(app.store.list()[1].temperature, 38.2);
        assert_eq!(app.store.list()[1].category, Category::Exercise);
    }

    #[test]
    fn delete_removes_selected_and_clamps() {
        let mut app = app();
        app.selected = 2;
        app.delete_selected();
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.selected, 1);
        assert_eq!(app.status, "deleted record 3");
    }

    #[test]
    fn save_failures_reach_the_status_line() {
        let store = RecordStore::open(FailingStorage, SequentialIdGenerator::default());
        let mut app = App::new(store, &TuiConfig::default());
        app.open_add_dialog();
        let dialog = app.dialog.as_mut().expect("dialog");
        dialog.form.date = "2024-03-01".to_string();
        dialog.form.blood_pressure = "118/76".to_string();

        app.submit_dialog();

        assert_eq!(app.store.len(), 1);
        assert!(app.status.starts_with("failed to save records"));
    }

    #[test]
    fn tabs_cycle() {
        let mut app = app();
        app.next_tab();
        assert_eq!(app.tab, Tab::Charts);
        app.next_tab();
        assert_eq!(app.tab, Tab::Records);
        assert_eq!(app.trend().len(), 3);
    }
}
