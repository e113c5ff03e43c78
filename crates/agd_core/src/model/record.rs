//! Decision record (AGD) model.
//!
//! # Responsibility
//! - Define the record id, reference fields and relation kinds.
//! - Project a parsed frontmatter block into a typed `Record`.
//!
//! # Invariants
//! - `tags` keeps declaration order; duplicates are not removed.
//! - `references` keeps raw reference strings; resolution happens later.
//! - Only `obsoletes` and `updates` produce relation edges.

use crate::parse::frontmatter::{split_list, Frontmatter};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Identifier prefix shared by every decision record.
pub const AGD_PREFIX: &str = "AGD";
/// Frontmatter key holding the comma-separated tag list.
pub const TAGS_FIELD: &str = "tags";

static ID_AT_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^AGD-\d+").expect("valid id-at-start regex"));
static ID_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"AGD-(\d+)").expect("valid id-number regex"));

/// Canonical short identifier, e.g. `AGD-001`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgdId(String);

impl AgdId {
    /// Extracts the id anchored at the start of `value`.
    ///
    /// `AGD-001_slug.md` and `AGD-001` both yield `AGD-001`; anything that
    /// does not start with the id shape yields `None`.
    pub fn extract(value: &str) -> Option<Self> {
        ID_AT_START_RE
            .find(value)
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for AgdId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric ordering key for any path or name containing an AGD id.
///
/// Searches anywhere in `value` (unlike [`AgdId::extract`]). Values without
/// an id sort first as 0; ids too large for `u64` sort last.
pub fn sort_key(value: &str) -> u64 {
    ID_NUMBER_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|digits| digits.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Frontmatter fields that carry references to other records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RefField {
    /// Incoming: this record was obsoleted by the referenced one.
    ObsoletedBy,
    /// Incoming: this record was updated by the referenced one.
    UpdatedBy,
    /// Outgoing: this record updates the referenced one.
    Updates,
    /// Outgoing: this record obsoletes the referenced one.
    Obsoletes,
}

impl RefField {
    /// All reference fields, in the order they are validated.
    pub const ALL: [RefField; 4] = [
        RefField::ObsoletedBy,
        RefField::UpdatedBy,
        RefField::Updates,
        RefField::Obsoletes,
    ];

    /// Frontmatter key for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ObsoletedBy => "obsoleted_by",
            Self::UpdatedBy => "updated_by",
            Self::Updates => "updates",
            Self::Obsoletes => "obsoletes",
        }
    }

    /// Relation kind indexed for this field; `None` for incoming fields.
    pub fn relation_kind(self) -> Option<RelationKind> {
        match self {
            Self::Obsoletes => Some(RelationKind::Obsoletes),
            Self::Updates => Some(RelationKind::Updates),
            Self::ObsoletedBy | Self::UpdatedBy => None,
        }
    }
}

impl Display for RefField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a directed relation edge between two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationKind {
    Obsoletes,
    Updates,
}

impl RelationKind {
    /// Outgoing relation kinds in index collection order.
    pub const INDEXED: [RelationKind; 2] = [RelationKind::Obsoletes, RelationKind::Updates];

    /// Single-character marker used in `-(x)->` edge lines.
    pub fn marker(self) -> char {
        match self {
            Self::Obsoletes => 'o',
            Self::Updates => 'u',
        }
    }

    /// Frontmatter field declaring this relation.
    pub fn field(self) -> RefField {
        match self {
            Self::Obsoletes => RefField::Obsoletes,
            Self::Updates => RefField::Updates,
        }
    }
}

/// Directed edge derived from an outgoing reference field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    /// Source path relative to the framework directory.
    pub source: String,
    /// Target path relative to the framework directory.
    pub target: String,
    pub kind: RelationKind,
}

/// One decision record as seen through its frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// `None` when the file name does not start with an AGD id.
    pub id: Option<AgdId>,
    pub path: PathBuf,
    /// Declared tags in declaration order.
    pub tags: Vec<String>,
    /// Raw, trimmed reference strings per declared field.
    pub references: BTreeMap<RefField, Vec<String>>,
}

impl Record {
    /// Builds a record view from a parsed frontmatter block.
    pub fn from_frontmatter(path: impl Into<PathBuf>, frontmatter: &Frontmatter) -> Self {
        let path = path.into();
        let id = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(AgdId::extract);
        let tags = frontmatter.get(TAGS_FIELD).map(split_list).unwrap_or_default();

        let mut references = BTreeMap::new();
        for field in RefField::ALL {
            let refs = frontmatter
                .get(field.as_str())
                .map(split_list)
                .unwrap_or_default();
            if !refs.is_empty() {
                references.insert(field, refs);
            }
        }

        Self {
            id,
            path,
            tags,
            references,
        }
    }

    /// File name of the record, lossy for non UTF-8 names.
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }

    /// Reference strings declared for `field`, empty when absent.
    pub fn refs(&self, field: RefField) -> &[String] {
        self.references
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ordering key used by both index artifacts.
    pub fn sort_key(&self) -> u64 {
        sort_key(&self.file_name())
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
