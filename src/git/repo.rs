use crate::error::{LocError, Result};
use crate::git::{command, HistorySource};
use crate::model::CommitInfo;
use chrono::DateTime;
use gix::{ObjectId, Repository};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

const BRANCH_CANDIDATES: [&str; 4] = [
    "refs/heads/main",
    "refs/remotes/origin/main",
    "refs/heads/master",
    "refs/remotes/origin/master",
];

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
    branch: String,
}

impl GitRepo {
    /// Open the clone at `path` and pick the branch whose history is replayed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = gix::open(path.as_ref())?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        let branch = detect_default_branch(&repo)?;

        Ok(Self { repo, path, branch })
    }

    /// `main` when present, then `master`, then whatever `HEAD` points at.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn checkout_branch(&self) -> Result<()> {
        command::checkout(&self.path, &self.branch)
    }

    /// Every commit reachable from the branch tip, oldest first by committer time.
    pub fn collect_commits(&self) -> Result<Vec<CommitInfo>> {
        let tip = self
            .repo
            .rev_parse_single(self.branch.as_str())
            .map_err(|e| LocError::Parse(format!("Invalid revision '{}': {e}", self.branch)))?;
        let tip = tip
            .object()?
            .try_into_commit()
            .map_err(|_| LocError::Parse(format!("Not a commit: {}", self.branch)))?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([tip.id]);

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| LocError::InvalidDate(format!("Invalid timestamp: {secs}")))?;
            let author = commit.author()?;

            commits.push(CommitInfo {
                id: commit_id.to_string(),
                author_name: author.name.to_string(),
                timestamp,
            });

            for pid in commit.parent_ids() {
                stack.push_back(pid.detach());
            }
        }

        // parents are discovered after their children; reverse so equal timestamps stay parent-first
        commits.reverse();
        commits.sort_by_key(|c| c.timestamp);
        Ok(commits)
    }
}

impl HistorySource for GitRepo {
    fn commits(&self) -> Result<Vec<CommitInfo>> {
        self.collect_commits()
    }

    fn checkout(&self, commit: &CommitInfo) -> Result<()> {
        command::checkout(&self.path, &commit.id)
    }

    fn worktree(&self) -> &Path {
        &self.path
    }
}

fn detect_default_branch(repo: &Repository) -> Result<String> {
    for candidate in BRANCH_CANDIDATES {
        let found = repo
            .try_find_reference(candidate)
            .map_err(|e| LocError::GitRepo(format!("Failed to look up {candidate}: {e}")))?;
        if found.is_some() {
            return Ok(candidate.to_string());
        }
    }
    Ok("HEAD".to_string())
}
