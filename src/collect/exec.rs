use super::series::build_series;
use crate::cli::CommonArgs;
use crate::cloc::{Cloc, LineCounter};
use crate::config::Config;
use crate::error::Result;
use crate::export::{
    output_json, series_file_name, write_aggregated_file, write_combined_file, write_series_file,
    COMBINED_FILE,
};
use crate::git::{command, GitRepo};
use crate::model::RepositorySeries;
use crate::report::RunReport;
use crate::total::{aggregate, discover_languages, OUTPUT_FILE};
use crate::util::short_name;
use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub fn exec(common: &CommonArgs, out_dir: &Path, cloc: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let config = Config::from_args(common)?;
    let counter = cloc.map(Cloc::new).unwrap_or_else(Cloc::locate);
    let started = Instant::now();

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    println!("Processing repositories: {}", config.repos.join(", "));
    tracing::info!(cloc = %counter.program().display(), "line counter");

    let mut report = RunReport::new();
    let mut collected: Vec<RepositorySeries> = Vec::new();

    for repo in &config.repos {
        let progress = progress_bar(common.quiet);
        let outcome = process_repository(&config, repo, &counter, &progress);
        progress.finish_and_clear();

        match outcome {
            Ok(series) if series.is_empty() => {
                report.record_failure(repo.as_str(), "no commits could be counted");
            }
            Ok(series) => {
                report.record_success(format!(
                    "{repo} ({} records, {} languages)",
                    series.records.len(),
                    series.languages.len()
                ));
                collected.push(series);
            }
            Err(e) => report.record_failure(repo.as_str(), e),
        }
    }

    let languages = discover_languages(&collected);
    for series in &collected {
        let path = out_dir.join(series_file_name(&series.repo_name));
        write_series_file(&path, series, &languages)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("- {}: {}", short_name(&series.repo_name), path.display());
    }

    let combined = out_dir.join(COMBINED_FILE);
    write_combined_file(&combined, &collected, &languages)
        .with_context(|| format!("Failed to write {}", combined.display()))?;

    let aggregated = aggregate(&collected);
    let total = out_dir.join(OUTPUT_FILE);
    write_aggregated_file(&total, &aggregated)
        .with_context(|| format!("Failed to write {}", total.display()))?;

    println!("- Combined file: {}", combined.display());
    println!("- Total growth: {}", total.display());

    if json {
        output_json(&aggregated, collected.iter().map(|s| s.repo_name.clone()).collect())?;
    }

    report.print_summary("Collection Summary");
    println!(
        "Finished in {}",
        style(humantime::format_duration(std::time::Duration::from_secs(
            started.elapsed().as_secs()
        )))
        .dim()
    );
    Ok(())
}

/// Clone into a scratch directory, replay the branch, and drop the clone again.
fn process_repository(
    config: &Config,
    repo: &str,
    counter: &dyn LineCounter,
    progress: &ProgressBar,
) -> Result<RepositorySeries> {
    tracing::info!(repo, "processing repository");
    let scratch = tempfile::Builder::new().prefix("locgrowth-").tempdir()?;
    let clone_dir = scratch.path().join(short_name(repo));

    // scratch is removed on drop if any of these fail
    command::clone_repository(&config.clone_url(repo), &clone_dir, false)?;
    let git = GitRepo::open(&clone_dir)?;
    git.checkout_branch()?;
    tracing::info!(repo, branch = git.branch(), "replaying branch");

    let build = build_series(repo, &git, counter, progress)?;
    if !build.skipped.is_empty() {
        tracing::warn!(repo, skipped = build.skipped.len(), "some commits were not counted");
    }

    drop(git);
    if let Err(e) = scratch.close() {
        tracing::warn!(repo, error = %e, "could not remove temporary clone");
    }

    Ok(build.series)
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len} commits")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
