//! Bulk loaders feeding the store.
//!
//! # Responsibility
//! - Turn external tabular data into `insert_speech` calls.
//! - Report per-row outcomes without aborting on a single bad row.

pub mod csv_import;
