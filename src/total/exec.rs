use super::{aggregate, discover_series_files, read_series_file, OUTPUT_FILE};
use crate::export::{output_json, write_aggregated_file};
use anyhow::Context;
use console::style;
use std::path::{Path, PathBuf};

pub fn exec(dir: &Path, output: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| dir.join(OUTPUT_FILE));

    let files = discover_series_files(dir)
        .with_context(|| format!("Failed to list series files in {}", dir.display()))?;
    if files.is_empty() {
        tracing::warn!(dir = %dir.display(), "no code_growth-*.csv files found, writing anchor only");
    } else {
        tracing::info!(count = files.len(), "aggregating series files");
    }

    let mut series = Vec::with_capacity(files.len());
    for path in &files {
        tracing::debug!(file = %path.display(), "reading series");
        match read_series_file(path) {
            Ok(s) => series.push(s),
            Err(e) => tracing::warn!(file = %path.display(), error = %e, "skipping unreadable series"),
        }
    }

    let aggregated = aggregate(&series);
    write_aggregated_file(&output, &aggregated)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if json {
        let inputs = files.iter().map(|p| p.display().to_string()).collect();
        output_json(&aggregated, inputs)?;
    } else {
        println!(
            "Total code growth written to {} ({} repositories, {} languages, {} dates)",
            style(output.display()).bold(),
            style(series.len()).cyan(),
            style(aggregated.languages.len()).cyan(),
            style(aggregated.rows.len()).cyan()
        );
    }

    Ok(())
}
