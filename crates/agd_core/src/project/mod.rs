//! Project layout and configuration loading.
//!
//! # Responsibility
//! - Derive every framework path from one injected project root.
//! - Load the tag allow-list from `config.json`.
//!
//! # Invariants
//! - The core never discovers the project root itself; callers pass it in.
//! - Missing or unparseable configuration never aborts validation.

pub mod config;
pub mod layout;
