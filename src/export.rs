use crate::error::Result;
use crate::model::{AggregatedSeries, RepositorySeries, TotalOutput, SCHEMA_VERSION};
use crate::util::{format_date, short_name};
use chrono::Utc;
use csv::Writer;
use std::io::Write;
use std::path::Path;

pub const SERIES_COLUMNS: [&str; 6] = [
    "repo_name",
    "commit_hash",
    "datetime",
    "author",
    "lines_of_code",
    "delta",
];

pub const TOTAL_COLUMNS: [&str; 2] = ["date", "total_loc"];

pub fn series_file_name(repo: &str) -> String {
    format!("code_growth-{}.csv", short_name(repo))
}

pub const COMBINED_FILE: &str = "code_growth.csv";

fn header(fixed: &[&str], languages: &[String]) -> Vec<String> {
    fixed
        .iter()
        .map(|c| c.to_string())
        .chain(languages.iter().cloned())
        .collect()
}

/// Rows of one repository under the shared `languages` columns; absent languages are `0`.
pub fn write_series_rows<W: Write>(
    writer: &mut Writer<W>,
    series: &RepositorySeries,
    languages: &[String],
) -> Result<()> {
    let repo = short_name(&series.repo_name);
    for record in &series.records {
        let mut row = vec![
            repo.to_string(),
            record.commit_hash.clone(),
            format_date(&record.date),
            record.author.clone(),
            record.total_loc.to_string(),
            record.delta.to_string(),
        ];
        row.extend(languages.iter().map(|l| record.language_loc(l).to_string()));
        writer.write_record(&row)?;
    }
    Ok(())
}

pub fn write_series_file(path: &Path, series: &RepositorySeries, languages: &[String]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(header(&SERIES_COLUMNS, languages))?;
    write_series_rows(&mut writer, series, languages)?;
    writer.flush()?;
    Ok(())
}

/// Every repository's rows in one file, in the order given.
pub fn write_combined_file(path: &Path, series: &[RepositorySeries], languages: &[String]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(header(&SERIES_COLUMNS, languages))?;
    for s in series {
        write_series_rows(&mut writer, s, languages)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_aggregated<W: Write>(out: W, aggregated: &AggregatedSeries) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(header(&TOTAL_COLUMNS, &aggregated.languages))?;
    for row in &aggregated.rows {
        let mut fields = vec![format_date(&row.date), row.total_loc.to_string()];
        fields.extend(row.values.iter().map(u64::to_string));
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_aggregated_file(path: &Path, aggregated: &AggregatedSeries) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_aggregated(std::io::BufWriter::new(file), aggregated)
}

pub fn output_json(aggregated: &AggregatedSeries, inputs: Vec<String>) -> anyhow::Result<()> {
    let output = TotalOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        inputs,
        series: aggregated.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
