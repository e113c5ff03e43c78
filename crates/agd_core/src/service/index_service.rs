//! Tag and relation index generation.
//!
//! # Responsibility
//! - Aggregate tags and outgoing relation edges across all records.
//! - Render and overwrite `INDEX-TAGS.md` and `INDEX-AGD-RELATIONS.md`.
//!
//! # Invariants
//! - Records are ordered by numeric id ascending; ties keep file name order.
//! - Only `obsoletes` and `updates` produce edges.
//! - Unresolvable references and unreadable records are skipped silently.
//! - Rendering is deterministic: same records, byte-identical output.

use crate::model::record::{file_name_of, RelationEdge, RelationKind, Record};
use crate::parse::frontmatter::parse_frontmatter;
use crate::project::layout::{ProjectLayout, DECISIONS_DIR};
use crate::repo::decision_repo::{
    DecisionRepository, FsDecisionRepository, RepoError, RepoResult,
};
use crate::repo::resolver::resolve_reference;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

const TAGS_INDEX_HEADER: &str = "# Tags Index\n\n\
<!-- AUTO-GENERATED - DO NOT EDIT -->\n\
<!-- Search with: grep \"#tagname\" INDEX-TAGS.md -->\n\n";

const RELATIONS_INDEX_HEADER: &str = "# AGD Relations Index\n\n\
<!-- AUTO-GENERATED - DO NOT EDIT -->\n\
<!-- -(o)-> : obsoletes, -(u)-> : updates -->\n\
<!-- Search with: grep \"AGD-001\" INDEX-AGD-RELATIONS.md -->\n\n";

const TAG_MARKER: char = '#';

/// Index generation errors.
#[derive(Debug)]
pub enum IndexServiceError {
    Repo(RepoError),
    Write { path: PathBuf, source: io::Error },
}

impl Display for IndexServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Write { path, source } => {
                write!(f, "cannot write index `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for IndexServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<RepoError> for IndexServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One tag index line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Record path relative to the framework directory.
    pub path: String,
    /// Declared tags in declaration order, without marker.
    pub tags: Vec<String>,
}

/// Aggregated data for both index artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexData {
    pub tags: Vec<TagEntry>,
    pub relations: Vec<RelationEdge>,
}

/// Counts reported after a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub tagged_files: usize,
    pub relations: usize,
}

impl Display for IndexSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files tagged, {} relations",
            self.tagged_files, self.relations
        )
    }
}

/// Index aggregation over one decisions repository.
pub struct IndexService<R: DecisionRepository> {
    repo: R,
}

impl<R: DecisionRepository> IndexService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Collects tag entries and relation edges from every readable record.
    pub fn collect(&self) -> RepoResult<IndexData> {
        let mut data = IndexData::default();
        if !self.repo.exists() {
            return Ok(data);
        }

        let mut records = Vec::new();
        for path in self.repo.list_record_files()? {
            match self.repo.read_record(&path) {
                Ok(content) => {
                    records.push(Record::from_frontmatter(&path, &parse_frontmatter(&content)))
                }
                Err(err) => warn!(
                    "event=index_collect module=index status=skip_unreadable error={err}"
                ),
            }
        }
        records.sort_by_key(Record::sort_key);

        for record in &records {
            let source = relative_record_path(&record.path);
            if !record.tags.is_empty() {
                data.tags.push(TagEntry {
                    path: source.clone(),
                    tags: record.tags.clone(),
                });
            }

            for kind in RelationKind::INDEXED {
                for reference in record.refs(kind.field()) {
                    if let Some(target) = resolve_reference(&self.repo, reference)?.path() {
                        data.relations.push(RelationEdge {
                            source: source.clone(),
                            target: relative_record_path(target),
                            kind,
                        });
                    }
                }
            }
        }

        Ok(data)
    }
}

/// Renders the full `INDEX-TAGS.md` content.
pub fn render_tags_index(entries: &[TagEntry]) -> String {
    let mut content = String::from(TAGS_INDEX_HEADER);
    for entry in entries {
        let tags: Vec<String> = entry
            .tags
            .iter()
            .map(|tag| format!("{TAG_MARKER}{tag}"))
            .collect();
        content.push_str(&format!("{}: {}\n", entry.path, tags.join(", ")));
    }
    content
}

/// Renders the full `INDEX-AGD-RELATIONS.md` content.
pub fn render_relations_index(edges: &[RelationEdge]) -> String {
    let mut content = String::from(RELATIONS_INDEX_HEADER);
    for edge in edges {
        content.push_str(&format!(
            "{} -({})-> {}\n",
            edge.source,
            edge.kind.marker(),
            edge.target
        ));
    }
    content
}

/// Regenerates both index artifacts for the project at `layout`.
///
/// A missing decisions directory produces header-only artifacts.
///
/// # Errors
/// - `Repo` when the decisions directory cannot be listed.
/// - `Write` when the framework directory or an artifact cannot be written.
pub fn generate_indexes(layout: &ProjectLayout) -> Result<IndexSummary, IndexServiceError> {
    let started_at = Instant::now();
    let service = IndexService::new(FsDecisionRepository::new(layout.decisions_dir()));
    let data = service.collect()?;

    let agents_dir = layout.agents_dir();
    std::fs::create_dir_all(&agents_dir).map_err(|source| write_error(&agents_dir, source))?;
    write_artifact(&layout.tags_index_path(), &render_tags_index(&data.tags))?;
    write_artifact(
        &layout.relations_index_path(),
        &render_relations_index(&data.relations),
    )?;

    let summary = IndexSummary {
        tagged_files: data.tags.len(),
        relations: data.relations.len(),
    };
    info!(
        "event=index_generate module=index status=ok tagged_files={} relations={} duration_ms={}",
        summary.tagged_files,
        summary.relations,
        started_at.elapsed().as_millis()
    );
    Ok(summary)
}

fn relative_record_path(path: &Path) -> String {
    format!("{DECISIONS_DIR}/{}", file_name_of(path))
}

fn write_artifact(path: &Path, content: &str) -> Result<(), IndexServiceError> {
    std::fs::write(path, content).map_err(|source| write_error(path, source))
}

fn write_error(path: &Path, source: io::Error) -> IndexServiceError {
    error!(
        "event=index_write module=index status=error path={} error={source}",
        path.display()
    );
    IndexServiceError::Write {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::{render_relations_index, render_tags_index, TagEntry};
    use crate::model::record::{RelationEdge, RelationKind};

    #[test]
    fn tags_index_prefixes_each_tag_in_declaration_order() {
        let rendered = render_tags_index(&[TagEntry {
            path: "decisions/AGD-001_a.md".to_string(),
            tags: vec!["c".to_string(), "a".to_string(), "b".to_string()],
        }]);
        assert!(rendered.starts_with("# Tags Index\n\n<!-- AUTO-GENERATED - DO NOT EDIT -->\n"));
        assert!(rendered.ends_with("\n\ndecisions/AGD-001_a.md: #c, #a, #b\n"));
    }

    #[test]
    fn relation_lines_use_kind_markers() {
        let rendered = render_relations_index(&[
            RelationEdge {
                source: "decisions/AGD-002_b.md".to_string(),
                target: "decisions/AGD-001_a.md".to_string(),
                kind: RelationKind::Obsoletes,
            },
            RelationEdge {
                source: "decisions/AGD-003_c.md".to_string(),
                target: "decisions/AGD-002_b.md".to_string(),
                kind: RelationKind::Updates,
            },
        ]);
        assert!(rendered.contains("decisions/AGD-002_b.md -(o)-> decisions/AGD-001_a.md\n"));
        assert!(rendered.ends_with("decisions/AGD-003_c.md -(u)-> decisions/AGD-002_b.md\n"));
    }

    #[test]
    fn empty_inputs_render_header_only() {
        assert_eq!(
            render_tags_index(&[]),
            "# Tags Index\n\n<!-- AUTO-GENERATED - DO NOT EDIT -->\n\
             <!-- Search with: grep \"#tagname\" INDEX-TAGS.md -->\n\n"
        );
        assert!(render_relations_index(&[]).ends_with("INDEX-AGD-RELATIONS.md -->\n\n"));
    }
}
