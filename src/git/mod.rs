pub mod command;
pub mod repo;

pub use repo::GitRepo;

use crate::error::Result;
use crate::model::CommitInfo;
use std::path::Path;

/// A repository whose history can be replayed one commit at a time in a single working tree.
pub trait HistorySource {
    /// Commits ordered oldest to newest.
    fn commits(&self) -> Result<Vec<CommitInfo>>;

    /// Materialise `commit` in [`HistorySource::worktree`].
    fn checkout(&self, commit: &CommitInfo) -> Result<()>;

    fn worktree(&self) -> &Path;
}
