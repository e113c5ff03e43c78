//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parsing and resolution into validation and index use-cases.
//! - Keep the CLI decoupled from directory and parsing details.
//!
//! # Invariants
//! - Per-record problems never abort a batch.
//! - Index artifacts are always regenerated wholesale.

pub mod gate_service;
pub mod index_service;
pub mod validate_service;
