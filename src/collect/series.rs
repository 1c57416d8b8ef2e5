use crate::cloc::{LineCount, LineCounter};
use crate::error::Result;
use crate::git::HistorySource;
use crate::model::{CommitInfo, DatedRecord, RepositorySeries};
use crate::report::UnitFailure;
use crate::util::local_datetime;
use indicatif::ProgressBar;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct SeriesBuild {
    pub series: RepositorySeries,
    /// Commits that could not be checked out or counted; absent from the series.
    pub skipped: Vec<UnitFailure>,
}

/// Replay `source` commit by commit and count lines at each one.
///
/// The working tree is shared, so commits are strictly sequential. A failing commit is
/// skipped and the next delta is taken against the last commit that was counted. The
/// series is empty (no anchor) when there is no history, nothing could be counted, or
/// the counter found no language in any commit.
pub fn build_series(
    repo_name: &str,
    source: &dyn HistorySource,
    counter: &dyn LineCounter,
    progress: &ProgressBar,
) -> Result<SeriesBuild> {
    let commits = source.commits()?;
    tracing::info!(repo = repo_name, commits = commits.len(), "replaying history");

    progress.set_length(commits.len() as u64);
    progress.set_message(repo_name.to_string());

    let mut counted: Vec<(CommitInfo, LineCount)> = Vec::with_capacity(commits.len());
    let mut skipped = Vec::new();

    for commit in commits {
        let result = source
            .checkout(&commit)
            .and_then(|_| counter.count(source.worktree()));
        match result {
            Ok(count) => counted.push((commit, count)),
            Err(e) => {
                progress.suspend(|| {
                    tracing::warn!(repo = repo_name, commit = commit.short_id(), error = %e, "skipping commit")
                });
                skipped.push(UnitFailure::new(format!("{repo_name}@{}", commit.short_id()), e));
            }
        }
        progress.inc(1);
    }

    let languages: BTreeSet<String> = counted
        .iter()
        .flat_map(|(_, count)| count.languages.keys().cloned())
        .collect();

    // nothing counted, or nothing the counter recognises as code
    if languages.is_empty() {
        return Ok(SeriesBuild {
            series: RepositorySeries::empty(repo_name),
            skipped,
        });
    }

    let mut series = RepositorySeries::anchored(repo_name);
    series.languages = languages;

    let mut previous_total: u64 = 0;
    for (commit, count) in counted {
        let per_language_loc = count.languages;
        let total_loc: u64 = per_language_loc.values().sum();
        let delta = total_loc as i64 - previous_total as i64;
        previous_total = total_loc;

        series.records.push(DatedRecord {
            commit_hash: commit.short_id().to_string(),
            author: commit.author_name,
            date: local_datetime(&commit.timestamp),
            total_loc,
            delta,
            per_language_loc,
        });
    }

    Ok(SeriesBuild { series, skipped })
}
