//! Domain model for the talk catalog.
//!
//! # Responsibility
//! - Define the records returned by the store (joined read models).
//! - Define write inputs and their validation rules.
//!
//! # Invariants
//! - Every record is identified by a store-assigned integer id that is never
//!   reused.
//! - Serialized field names match the catalog's public JSON shape.

pub mod catalog;
pub mod review;
pub mod speech;
pub mod validation;
