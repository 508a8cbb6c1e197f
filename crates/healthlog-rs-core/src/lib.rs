//! Health record keeping: model, validation, persistence and search.
//!
//! The [`RecordStore`] owns the ordered collection and mirrors it to an
//! injected [`RecordStorage`] slot after every mutation. Candidate records go
//! through [`validate`] (or [`RecordForm::submit`] for raw input) before they
//! reach the store, and [`RecordFilter`] derives the visible subset for
//! presentation.

pub mod error;
pub mod filter;
pub mod form;
pub mod ids;
pub mod model;
pub mod storage;
pub mod store;
pub mod trend;
pub mod validate;

/// Storage error type.
pub use error::StoreError;
/// Search and category filtering.
pub use filter::{RecordFilter, filter_records};
/// Raw form input.
pub use form::RecordForm;
/// Id generators.
pub use ids::{IdGenerator, SequentialIdGenerator, TimestampIdGenerator};
/// Record model.
pub use model::{Category, HealthRecord, NewHealthRecord, RecordId, UnknownCategory};
/// Persistence slot interface and default implementations.
pub use storage::{DEFAULT_SLOT, FileSlotStorage, MemoryStorage, RecordStorage};
/// Record store.
pub use store::RecordStore;
/// Trend chart series.
pub use trend::{SeriesSummary, TrendSeries};
/// Validation entry points.
pub use validate::{RecordDraft, RecordField, ValidationErrors, validate};
