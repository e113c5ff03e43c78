//! Filesystem layout of an AGD project.

use std::path::{Path, PathBuf};

/// Framework directory under the project root.
pub const AGENTS_DIR: &str = ".agents";
/// Record directory under the framework directory.
pub const DECISIONS_DIR: &str = "decisions";
/// Configuration file under the framework directory.
pub const CONFIG_FILE: &str = "config.json";
/// Generated tag index file under the framework directory.
pub const TAGS_INDEX_FILE: &str = "INDEX-TAGS.md";
/// Generated relation index file under the framework directory.
pub const RELATIONS_INDEX_FILE: &str = "INDEX-AGD-RELATIONS.md";

/// Paths of one project, all derived from `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.agents`
    pub fn agents_dir(&self) -> PathBuf {
        self.root.join(AGENTS_DIR)
    }

    /// `<root>/.agents/decisions`
    pub fn decisions_dir(&self) -> PathBuf {
        self.agents_dir().join(DECISIONS_DIR)
    }

    /// `<root>/.agents/config.json`
    pub fn config_path(&self) -> PathBuf {
        self.agents_dir().join(CONFIG_FILE)
    }

    pub fn tags_index_path(&self) -> PathBuf {
        self.agents_dir().join(TAGS_INDEX_FILE)
    }

    pub fn relations_index_path(&self) -> PathBuf {
        self.agents_dir().join(RELATIONS_INDEX_FILE)
    }

    /// Whether a tool-reported path points inside the decisions directory.
    ///
    /// Matching is textual containment, since hook payloads carry paths as
    /// plain strings that may not exist yet.
    pub fn is_in_decisions_dir(&self, file_path: &str) -> bool {
        let decisions = self.decisions_dir();
        file_path.contains(decisions.to_string_lossy().as_ref())
    }

    /// Whether a tool-reported path names a record file in the decisions
    /// directory (`.../decisions/.../AGD-...`).
    pub fn is_record_path(&self, file_path: &str) -> bool {
        self.is_in_decisions_dir(file_path) && file_path.contains("/AGD-")
    }
}
