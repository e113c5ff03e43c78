//! Pre-creation gate for proposed record content.
//!
//! # Responsibility
//! - Decide allow/block for content that has not been written yet.
//!
//! # Invariants
//! - Only tags are checked; references are left to the full audit.
//! - Any disallowed tag blocks; there is no partial acceptance.
//! - Paths outside the decisions directory are always allowed.
//! - A config without a `tags` key counts as no config; `"tags": []` blocks.

use crate::model::record::TAGS_FIELD;
use crate::parse::frontmatter::{parse_frontmatter, split_list};
use crate::project::config::{load_config_or_default, AgentsConfig};
use crate::project::layout::ProjectLayout;
use log::info;

/// Content about to be written, as reported by the calling tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedRecord<'a> {
    pub file_path: &'a str,
    pub content: &'a str,
}

/// Why the gate let a write through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    NotARecordPath,
    NoFrontmatter,
    NoTags,
    NoConfig,
    TagsAllowed,
}

impl AllowReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotARecordPath => "not_a_record_path",
            Self::NoFrontmatter => "no_frontmatter",
            Self::NoTags => "no_tags",
            Self::NoConfig => "no_config",
            Self::TagsAllowed => "tags_allowed",
        }
    }
}

/// Binary gate outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow(AllowReason),
    Block {
        /// Offending tags in declaration order.
        invalid_tags: Vec<String>,
        /// Allow-list at decision time; empty means none configured yet.
        allowed_tags: Vec<String>,
    },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Checks the tags of `content` against an already loaded configuration.
pub fn evaluate_tags(content: &str, config: Option<&AgentsConfig>) -> GateDecision {
    let frontmatter = parse_frontmatter(content);
    if frontmatter.is_empty() {
        return GateDecision::Allow(AllowReason::NoFrontmatter);
    }
    let Some(tags_value) = frontmatter.get_non_empty(TAGS_FIELD) else {
        return GateDecision::Allow(AllowReason::NoTags);
    };
    let Some(config) = config.filter(|config| config.declares_tags()) else {
        return GateDecision::Allow(AllowReason::NoConfig);
    };

    let invalid_tags: Vec<String> = split_list(tags_value)
        .into_iter()
        .filter(|tag| !config.allows_tag(tag))
        .collect();
    if invalid_tags.is_empty() {
        GateDecision::Allow(AllowReason::TagsAllowed)
    } else {
        GateDecision::Block {
            invalid_tags,
            allowed_tags: config.allowed_tags().to_vec(),
        }
    }
}

/// Runs the gate for a proposed write inside the project at `layout`.
pub fn pre_validate(layout: &ProjectLayout, proposed: ProposedRecord<'_>) -> GateDecision {
    if !layout.is_record_path(proposed.file_path) {
        return GateDecision::Allow(AllowReason::NotARecordPath);
    }

    let config = load_config_or_default(&layout.config_path());
    let decision = evaluate_tags(proposed.content, config.as_ref());
    match &decision {
        GateDecision::Allow(reason) => info!(
            "event=pre_validate module=gate status=allow reason={}",
            reason.as_str()
        ),
        GateDecision::Block { invalid_tags, .. } => info!(
            "event=pre_validate module=gate status=block invalid_tags={}",
            invalid_tags.len()
        ),
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::{evaluate_tags, AllowReason, GateDecision};
    use crate::project::config::AgentsConfig;

    fn config(tags: &[&str]) -> AgentsConfig {
        AgentsConfig {
            tags: Some(tags.iter().map(|tag| tag.to_string()).collect()),
            ..AgentsConfig::default()
        }
    }

    #[test]
    fn allows_content_without_frontmatter_or_tags() {
        let cfg = config(&["bug"]);
        assert_eq!(
            evaluate_tags("# plain", Some(&cfg)),
            GateDecision::Allow(AllowReason::NoFrontmatter)
        );
        assert_eq!(
            evaluate_tags("---\ntitle: x\ntags: \"\"\n---\n", Some(&cfg)),
            GateDecision::Allow(AllowReason::NoTags)
        );
    }

    #[test]
    fn allows_tags_when_no_config_is_available() {
        assert_eq!(
            evaluate_tags("---\ntags: anything\n---\n", None),
            GateDecision::Allow(AllowReason::NoConfig)
        );
    }

    #[test]
    fn config_without_tags_key_counts_as_no_config() {
        assert_eq!(
            evaluate_tags("---\ntags: db\n---\n", Some(&AgentsConfig::default())),
            GateDecision::Allow(AllowReason::NoConfig)
        );
    }

    #[test]
    fn blocks_on_any_disallowed_tag() {
        let cfg = config(&["bug", "feature"]);
        let decision = evaluate_tags("---\ntags: bug, typo, style\n---\n", Some(&cfg));
        assert_eq!(
            decision,
            GateDecision::Block {
                invalid_tags: vec!["typo".to_string(), "style".to_string()],
                allowed_tags: vec!["bug".to_string(), "feature".to_string()],
            }
        );
    }

    #[test]
    fn empty_allow_list_blocks_declared_tags() {
        let decision = evaluate_tags("---\ntags: bug\n---\n", Some(&config(&[])));
        assert!(!decision.is_allowed());
    }
}
