//! Full audit of every decision record.
//!
//! # Responsibility
//! - Check declared tags against the configured allow-list.
//! - Check every reference field for id shape and target existence.
//!
//! # Invariants
//! - Both checks run for every record; nothing short-circuits.
//! - An empty allow-list rejects every declared tag.
//! - An unreadable record yields one issue and the batch continues.

use crate::model::record::{file_name_of, AgdId, RefField, Record};
use crate::parse::frontmatter::parse_frontmatter;
use crate::project::config::load_config_or_default;
use crate::project::layout::ProjectLayout;
use crate::repo::decision_repo::{DecisionRepository, FsDecisionRepository, RepoResult};
use crate::repo::resolver::{resolve_reference, Resolution};
use log::{info, warn};
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// One problem found in one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Declared tag missing from the allow-list.
    InvalidTag { file: String, tag: String },
    /// Reference that does not start with `AGD-<digits>`.
    MalformedReference {
        file: String,
        field: RefField,
        reference: String,
    },
    /// Well-formed reference without a matching record file.
    UnresolvedReference {
        file: String,
        field: RefField,
        id: AgdId,
    },
    /// Record file that could not be read.
    UnreadableRecord { file: String, message: String },
}

impl ValidationIssue {
    /// File name the issue belongs to.
    pub fn file(&self) -> &str {
        match self {
            Self::InvalidTag { file, .. }
            | Self::MalformedReference { file, .. }
            | Self::UnresolvedReference { file, .. }
            | Self::UnreadableRecord { file, .. } => file,
        }
    }

    pub fn is_tag_issue(&self) -> bool {
        matches!(self, Self::InvalidTag { .. })
    }

    pub fn is_reference_issue(&self) -> bool {
        matches!(
            self,
            Self::MalformedReference { .. } | Self::UnresolvedReference { .. }
        )
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag { file, tag } => {
                write!(f, "{file}: invalid tag '{tag}' (not in config.tags)")
            }
            Self::MalformedReference {
                file,
                field,
                reference,
            } => write!(f, "{file}: invalid reference format '{reference}' in {field}"),
            Self::UnresolvedReference { file, field, id } => {
                write!(f, "{file}: {field} references non-existent {id}")
            }
            Self::UnreadableRecord { file, message } => {
                write!(f, "{file}: cannot read file - {message}")
            }
        }
    }
}

/// Result of one full validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of record files visited, readable or not.
    pub records_checked: usize,
    /// Every issue found, grouped by record in listing order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue messages in report order.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Validation service over one decisions repository.
pub struct ValidateService<R: DecisionRepository> {
    repo: R,
    allowed_tags: Vec<String>,
}

impl<R: DecisionRepository> ValidateService<R> {
    /// Creates a service checking against `allowed_tags`.
    pub fn new(repo: R, allowed_tags: Vec<String>) -> Self {
        Self { repo, allowed_tags }
    }

    /// Validates every record file in the repository.
    ///
    /// # Errors
    /// - Returns an error only when the directory itself cannot be listed.
    pub fn validate_all(&self) -> RepoResult<ValidationReport> {
        let mut report = ValidationReport::default();
        if !self.repo.exists() {
            return Ok(report);
        }

        for path in self.repo.list_record_files()? {
            report.records_checked += 1;
            let file = file_name_of(&path);
            let content = match self.repo.read_record(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!("event=record_read module=validate status=error file={file}");
                    report.issues.push(ValidationIssue::UnreadableRecord {
                        file,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let record = Record::from_frontmatter(&path, &parse_frontmatter(&content));
            report.issues.extend(self.validate_record(&record)?);
        }

        Ok(report)
    }

    /// Runs the tag check and the reference check for one record.
    pub fn validate_record(&self, record: &Record) -> RepoResult<Vec<ValidationIssue>> {
        let file = record.file_name();
        let mut issues = check_tags(&file, &record.tags, &self.allowed_tags);
        issues.extend(self.check_references(&file, record)?);
        Ok(issues)
    }

    fn check_references(&self, file: &str, record: &Record) -> RepoResult<Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        for field in RefField::ALL {
            for reference in record.refs(field) {
                match resolve_reference(&self.repo, reference)? {
                    Resolution::Resolved { .. } => {}
                    Resolution::Malformed => issues.push(ValidationIssue::MalformedReference {
                        file: file.to_string(),
                        field,
                        reference: reference.clone(),
                    }),
                    Resolution::Unresolved(id) => {
                        issues.push(ValidationIssue::UnresolvedReference {
                            file: file.to_string(),
                            field,
                            id,
                        })
                    }
                }
            }
        }
        Ok(issues)
    }
}

/// Returns one issue per tag absent from `allowed_tags`.
pub fn check_tags(file: &str, tags: &[String], allowed_tags: &[String]) -> Vec<ValidationIssue> {
    tags.iter()
        .filter(|tag| !allowed_tags.contains(*tag))
        .map(|tag| ValidationIssue::InvalidTag {
            file: file.to_string(),
            tag: tag.clone(),
        })
        .collect()
}

/// Validates every record of the project rooted at `layout`.
///
/// Missing or unparseable configuration falls back to an empty allow-list.
pub fn validate_project(layout: &ProjectLayout) -> RepoResult<ValidationReport> {
    let started_at = Instant::now();
    let allowed_tags = load_config_or_default(&layout.config_path())
        .and_then(|config| config.tags)
        .unwrap_or_default();
    let service = ValidateService::new(
        FsDecisionRepository::new(layout.decisions_dir()),
        allowed_tags,
    );

    let report = service.validate_all()?;
    info!(
        "event=validate module=validate status={} records={} issues={} duration_ms={}",
        if report.is_valid() { "ok" } else { "invalid" },
        report.records_checked,
        report.issues.len(),
        started_at.elapsed().as_millis()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{check_tags, ValidateService, ValidationIssue};
    use crate::model::record::AgdId;
    use crate::repo::decision_repo::{DecisionRepository, RepoError, RepoResult};
    use std::collections::BTreeMap;
    use std::io;
    use std::path::{Path, PathBuf};

    /// In-memory repository; `None` content simulates an unreadable file.
    struct MemoryRepo {
        files: BTreeMap<String, Option<String>>,
    }

    impl MemoryRepo {
        fn new(files: &[(&str, Option<&str>)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(name, content)| (name.to_string(), content.map(str::to_string)))
                    .collect(),
            }
        }
    }

    impl DecisionRepository for MemoryRepo {
        fn exists(&self) -> bool {
            true
        }

        fn list_record_files(&self) -> RepoResult<Vec<PathBuf>> {
            Ok(self.files.keys().map(PathBuf::from).collect())
        }

        fn read_record(&self, path: &Path) -> RepoResult<String> {
            let name = path.to_string_lossy().into_owned();
            match self.files.get(&name) {
                Some(Some(content)) => Ok(content.clone()),
                _ => Err(RepoError::Io {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                }),
            }
        }

        fn find_by_id(&self, id: &AgdId) -> RepoResult<Vec<PathBuf>> {
            let prefix = format!("{id}_");
            Ok(self
                .files
                .keys()
                .filter(|name| name.starts_with(prefix.as_str()))
                .map(PathBuf::from)
                .collect())
        }
    }

    #[test]
    fn check_tags_reports_each_disallowed_tag() {
        let allowed = vec!["bug".to_string(), "feature".to_string()];
        let tags = vec!["bug".to_string(), "typo".to_string(), "x".to_string()];
        let issues = check_tags("AGD-001_a.md", &tags, &allowed);
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0].to_string(),
            "AGD-001_a.md: invalid tag 'typo' (not in config.tags)"
        );
    }

    #[test]
    fn unreadable_record_does_not_abort_batch() {
        let repo = MemoryRepo::new(&[
            ("AGD-001_locked.md", None),
            ("AGD-002_open.md", Some("---\ntags: typo\n---\n")),
        ]);
        let service = ValidateService::new(repo, vec!["bug".to_string()]);

        let report = service.validate_all().unwrap();
        assert_eq!(report.records_checked, 2);
        assert_eq!(report.issues.len(), 2);
        assert!(matches!(
            &report.issues[0],
            ValidationIssue::UnreadableRecord { file, .. } if file == "AGD-001_locked.md"
        ));
        assert!(report.issues[1].is_tag_issue());
    }

    #[test]
    fn tag_and_reference_checks_both_run() {
        let repo = MemoryRepo::new(&[(
            "AGD-001_a.md",
            Some("---\ntags: nope\nupdates: AGD-009, later\n---\n"),
        )]);
        let service = ValidateService::new(repo, Vec::new());

        let messages = service.validate_all().unwrap().messages();
        assert_eq!(
            messages,
            vec![
                "AGD-001_a.md: invalid tag 'nope' (not in config.tags)".to_string(),
                "AGD-001_a.md: updates references non-existent AGD-009".to_string(),
                "AGD-001_a.md: invalid reference format 'later' in updates".to_string(),
            ]
        );
    }
}
