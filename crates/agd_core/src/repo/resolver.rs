//! Reference resolution from short ids to record files.

use crate::model::record::AgdId;
use crate::repo::decision_repo::{DecisionRepository, RepoResult};
use std::path::PathBuf;

/// Outcome of resolving one reference string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The reference names an existing record file.
    Resolved { id: AgdId, path: PathBuf },
    /// The reference does not start with `AGD-<digits>`.
    Malformed,
    /// Well-formed id without a matching record file.
    Unresolved(AgdId),
}

impl Resolution {
    /// Resolved target path, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Resolved { path, .. } => Some(path),
            Self::Malformed | Self::Unresolved(_) => None,
        }
    }
}

/// Resolves `reference` against the records of `repo`.
///
/// When several files share the id prefix the first one in sorted listing
/// order wins; collisions are not reported.
pub fn resolve_reference<R: DecisionRepository + ?Sized>(
    repo: &R,
    reference: &str,
) -> RepoResult<Resolution> {
    let Some(id) = AgdId::extract(reference) else {
        return Ok(Resolution::Malformed);
    };

    let resolution = match repo.find_by_id(&id)?.into_iter().next() {
        Some(path) => Resolution::Resolved { id, path },
        None => Resolution::Unresolved(id),
    };
    Ok(resolution)
}
