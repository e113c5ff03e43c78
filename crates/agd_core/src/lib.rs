//! Core logic for AGD decision records.
//! Parsing, reference resolution, validation and index generation live here;
//! the `agd` binary only resolves the project root and prints results.

pub mod logging;
pub mod model;
pub mod parse;
pub mod project;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{sort_key, AgdId, Record, RefField, RelationEdge, RelationKind};
pub use parse::frontmatter::{parse_frontmatter, split_list, Frontmatter};
pub use project::config::{load_config, load_config_or_default, AgentsConfig, ConfigError};
pub use project::layout::ProjectLayout;
pub use repo::decision_repo::{DecisionRepository, FsDecisionRepository, RepoError, RepoResult};
pub use repo::resolver::{resolve_reference, Resolution};
pub use service::gate_service::{
    evaluate_tags, pre_validate, AllowReason, GateDecision, ProposedRecord,
};
pub use service::index_service::{
    generate_indexes, render_relations_index, render_tags_index, IndexData, IndexService,
    IndexServiceError, IndexSummary, TagEntry,
};
pub use service::validate_service::{
    check_tags, validate_project, ValidateService, ValidationIssue, ValidationReport,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
