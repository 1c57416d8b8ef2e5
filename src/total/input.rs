use crate::error::Result;
use crate::model::{DatedRecord, RepositorySeries};
use crate::util::parse_date;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const SERIES_PREFIX: &str = "code_growth-";
pub const SERIES_SUFFIX: &str = ".csv";

/// Columns before the per-language values.
const FIXED_COLUMNS: usize = 6;
const DATE_COLUMN: usize = 2;
const LOC_COLUMN: usize = 4;
const DELTA_COLUMN: usize = 5;

/// Per-repository CSV files in `dir`, sorted by file name.
pub fn discover_series_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(SERIES_PREFIX) && name.ends_with(SERIES_SUFFIX) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

pub fn read_series_file(path: &Path) -> Result<RepositorySeries> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.trim_start_matches(SERIES_PREFIX).to_string())
        .unwrap_or_else(|| path.display().to_string());
    let file = std::fs::File::open(path)?;
    read_series(&name, file)
}

/// Read one series in the `repo_name,commit_hash,datetime,author,lines_of_code,delta,<langs..>`
/// layout. Short or unreadable rows are dropped; the header's languages always count as
/// observed, even when no row carries a value for them.
pub fn read_series<R: Read>(name: &str, reader: R) -> Result<RepositorySeries> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let languages: Vec<String> = rdr
        .headers()?
        .iter()
        .skip(FIXED_COLUMNS)
        .map(str::to_string)
        .collect();

    let mut series = RepositorySeries::empty(name);
    series.languages = languages.iter().cloned().collect();

    for (line, row) in rdr.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(series = name, row = line + 1, error = %e, "unreadable row");
                continue;
            }
        };
        if row.len() < FIXED_COLUMNS {
            continue;
        }
        match parse_row(&row, &languages) {
            Ok(record) => series.records.push(record),
            Err(reason) => {
                tracing::warn!(series = name, row = line + 1, %reason, "skipping malformed row")
            }
        }
    }

    Ok(series)
}

fn parse_row(row: &StringRecord, languages: &[String]) -> std::result::Result<DatedRecord, String> {
    let date = parse_date(field(row, DATE_COLUMN)).map_err(|e| e.to_string())?;
    let total_loc = parse_count(field(row, LOC_COLUMN))?;
    let delta = match field(row, DELTA_COLUMN) {
        "" => 0,
        raw => raw
            .parse::<i64>()
            .map_err(|e| format!("bad delta '{raw}': {e}"))?,
    };

    let mut per_language_loc = BTreeMap::new();
    for (idx, language) in languages.iter().enumerate() {
        match row.get(FIXED_COLUMNS + idx) {
            None | Some("") => {}
            Some(raw) => {
                *per_language_loc.entry(language.clone()).or_insert(0) += parse_count(raw)?;
            }
        }
    }

    Ok(DatedRecord {
        commit_hash: field(row, 1).to_string(),
        author: field(row, 3).to_string(),
        date,
        total_loc,
        delta,
        per_language_loc,
    })
}

fn field(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

fn parse_count(raw: &str) -> std::result::Result<u64, String> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u64>()
        .map_err(|e| format!("bad line count '{raw}': {e}"))
}
