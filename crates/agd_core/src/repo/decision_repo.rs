//! Decision directory repository contract and filesystem implementation.
//!
//! # Responsibility
//! - List record files (`AGD-*.md`) in one decisions directory.
//! - Read record content and look up files by id prefix.
//!
//! # Invariants
//! - A missing directory lists as empty; it is not an error.
//! - Results are sorted by file name so every caller sees the same order.
//!
//! # See also
//! - `repo::resolver` for id resolution over `find_by_id`.

use crate::model::record::{file_name_of, AgdId, AGD_PREFIX};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

const RECORD_EXTENSION: &str = ".md";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository I/O error.
#[derive(Debug)]
pub enum RepoError {
    Io { path: PathBuf, source: io::Error },
}

impl RepoError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Read-only access to the records of one decisions directory.
pub trait DecisionRepository {
    /// Whether the backing directory exists.
    fn exists(&self) -> bool;
    /// Lists record files (`AGD-*.md`) sorted by file name.
    fn list_record_files(&self) -> RepoResult<Vec<PathBuf>>;
    /// Reads one record file as UTF-8 text.
    fn read_record(&self, path: &Path) -> RepoResult<String>;
    /// Returns record files named `<id>_*.md`, sorted by file name.
    fn find_by_id(&self, id: &AgdId) -> RepoResult<Vec<PathBuf>>;
}

/// Filesystem-backed decisions directory.
#[derive(Debug, Clone)]
pub struct FsDecisionRepository {
    dir: PathBuf,
}

impl FsDecisionRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn sorted_files_matching(&self, accept: impl Fn(&str) -> bool) -> RepoResult<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(RepoError::io(&self.dir, err)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| RepoError::io(&self.dir, err))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if accept(file_name_of(&path).as_str()) {
                files.push(path);
            }
        }
        // Why: read_dir order is filesystem-defined; resolver collisions and
        // index ties must come out the same on every machine.
        files.sort_by_key(|path| file_name_of(path));
        Ok(files)
    }
}

impl DecisionRepository for FsDecisionRepository {
    fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    fn list_record_files(&self) -> RepoResult<Vec<PathBuf>> {
        self.sorted_files_matching(is_record_file_name)
    }

    fn read_record(&self, path: &Path) -> RepoResult<String> {
        std::fs::read_to_string(path).map_err(|err| RepoError::io(path, err))
    }

    fn find_by_id(&self, id: &AgdId) -> RepoResult<Vec<PathBuf>> {
        let prefix = format!("{id}_");
        self.sorted_files_matching(|name| {
            name.starts_with(prefix.as_str()) && name.ends_with(RECORD_EXTENSION)
        })
    }
}

/// Whether `name` matches the `AGD-*.md` record file pattern.
pub fn is_record_file_name(name: &str) -> bool {
    name.strip_prefix(AGD_PREFIX)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|_| name.ends_with(RECORD_EXTENSION))
}
