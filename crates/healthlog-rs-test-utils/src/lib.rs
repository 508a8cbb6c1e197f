//! Test helpers shared across Healthlog crates.

pub mod records;
pub mod storage;

pub use records::{new_record, stored_record};
pub use storage::{CountingStorage, FailingStorage};
