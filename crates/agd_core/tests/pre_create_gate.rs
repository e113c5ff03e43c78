use agd_core::{pre_validate, AllowReason, GateDecision, ProjectLayout, ProposedRecord};
use std::fs;
use tempfile::TempDir;

fn project_with_config(config: Option<&str>) -> (TempDir, ProjectLayout) {
    let dir = TempDir::new().unwrap();
    let layout = ProjectLayout::new(dir.path());
    fs::create_dir_all(layout.agents_dir()).unwrap();
    if let Some(config) = config {
        fs::write(layout.config_path(), config).unwrap();
    }
    (dir, layout)
}

fn record_path(layout: &ProjectLayout, name: &str) -> String {
    layout.decisions_dir().join(name).to_string_lossy().into_owned()
}

#[test]
fn blocks_disallowed_tags_for_new_record() {
    let (_dir, layout) = project_with_config(Some(r#"{"tags": ["bug", "feature"]}"#));
    let path = record_path(&layout, "AGD-003_new.md");

    let decision = pre_validate(
        &layout,
        ProposedRecord {
            file_path: &path,
            content: "---\ntags: bug, typo\n---\nbody",
        },
    );
    assert_eq!(
        decision,
        GateDecision::Block {
            invalid_tags: vec!["typo".to_string()],
            allowed_tags: vec!["bug".to_string(), "feature".to_string()],
        }
    );
}

#[test]
fn allows_valid_tags_and_ignores_references() {
    let (_dir, layout) = project_with_config(Some(r#"{"tags": ["bug"]}"#));
    let path = record_path(&layout, "AGD-003_new.md");

    let decision = pre_validate(
        &layout,
        ProposedRecord {
            file_path: &path,
            content: "---\ntags: bug\nobsoletes: AGD-999\n---\n",
        },
    );
    assert_eq!(decision, GateDecision::Allow(AllowReason::TagsAllowed));
}

#[test]
fn paths_outside_decisions_are_not_gated() {
    let (_dir, layout) = project_with_config(Some(r#"{"tags": []}"#));
    let outside = layout.root().join("README.md").to_string_lossy().into_owned();
    let not_record = record_path(&layout, "notes.md");

    for file_path in [outside.as_str(), not_record.as_str()] {
        let decision = pre_validate(
            &layout,
            ProposedRecord {
                file_path,
                content: "---\ntags: anything\n---\n",
            },
        );
        assert_eq!(decision, GateDecision::Allow(AllowReason::NotARecordPath));
    }
}

#[test]
fn missing_config_allows_creation() {
    let (_dir, layout) = project_with_config(None);
    let path = record_path(&layout, "AGD-001_first.md");

    let decision = pre_validate(
        &layout,
        ProposedRecord {
            file_path: &path,
            content: "---\ntags: anything\n---\n",
        },
    );
    assert_eq!(decision, GateDecision::Allow(AllowReason::NoConfig));
}

#[test]
fn empty_allow_list_blocks_with_no_allowed_tags() {
    let (_dir, layout) = project_with_config(Some(r#"{"tags": []}"#));
    let path = record_path(&layout, "AGD-001_first.md");

    let decision = pre_validate(
        &layout,
        ProposedRecord {
            file_path: &path,
            content: "---\ntags: db\n---\n",
        },
    );
    assert!(matches!(
        decision,
        GateDecision::Block { ref allowed_tags, .. } if allowed_tags.is_empty()
    ));
}

#[test]
fn config_without_tags_key_allows_creation() {
    let (_dir, layout) = project_with_config(Some("{}"));
    let path = record_path(&layout, "AGD-001_first.md");

    let decision = pre_validate(
        &layout,
        ProposedRecord {
            file_path: &path,
            content: "---\ntags: db\n---\n",
        },
    );
    assert_eq!(decision, GateDecision::Allow(AllowReason::NoConfig));
}
