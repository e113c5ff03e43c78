//! Record storage access and reference resolution.
//!
//! # Responsibility
//! - Define the read-only contract used by validation and index services.
//! - Isolate directory listing details from service orchestration.
//!
//! # Invariants
//! - Listing order is deterministic (sorted by file name).
//! - Repositories never write record content.

pub mod decision_repo;
pub mod resolver;
