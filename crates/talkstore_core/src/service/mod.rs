//! Use-case layer.
//!
//! # Responsibility
//! - Compose repositories into the catalog operations callers depend on.
//! - Keep adapters (CLI, REST, HTML) decoupled from SQL and transactions.

pub mod talk_store;
