//! Decision record domain model.
//!
//! # Responsibility
//! - Define the canonical shapes shared by validation and index generation.
//! - Keep relation field names and relation markers in one place.
//!
//! # Invariants
//! - A record id always has the `AGD-<digits>` shape.
//! - Records are read-only views; the core never writes record content.

pub mod record;
