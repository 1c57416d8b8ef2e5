use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Timestamp layout used in every CSV; lexical order equals chronological order.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const ANCHOR_COMMIT: &str = "initial";
pub const ANCHOR_AUTHOR: &str = "N/A";

/// The common zero baseline every series starts from: `2024-11-01 00:00:00`.
pub fn anchor_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub id: String,
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    pub fn short_id(&self) -> &str {
        self.id.get(..7).unwrap_or(self.id.as_str())
    }
}

/// One observation of one repository at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedRecord {
    pub commit_hash: String,
    pub author: String,
    pub date: NaiveDateTime,
    pub total_loc: u64,
    pub delta: i64,
    pub per_language_loc: BTreeMap<String, u64>,
}

impl DatedRecord {
    pub fn anchor() -> Self {
        Self {
            commit_hash: ANCHOR_COMMIT.to_string(),
            author: ANCHOR_AUTHOR.to_string(),
            date: anchor_date(),
            total_loc: 0,
            delta: 0,
            per_language_loc: BTreeMap::new(),
        }
    }

    pub fn language_loc(&self, language: &str) -> u64 {
        self.per_language_loc.get(language).copied().unwrap_or(0)
    }
}

/// Records of one repository in commit order.
///
/// A non-empty series always starts with [`DatedRecord::anchor`]. `languages` is the
/// repository's observed language set; it may name languages that no record carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySeries {
    pub repo_name: String,
    pub languages: BTreeSet<String>,
    pub records: Vec<DatedRecord>,
}

impl RepositorySeries {
    pub fn empty(repo_name: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            languages: BTreeSet::new(),
            records: Vec::new(),
        }
    }

    pub fn anchored(repo_name: impl Into<String>) -> Self {
        let mut series = Self::empty(repo_name);
        series.records.push(DatedRecord::anchor());
        series
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Real observations, i.e. everything after the anchor.
    pub fn observations(&self) -> impl Iterator<Item = &DatedRecord> {
        let anchor = anchor_date();
        self.records.iter().filter(move |r| r.date != anchor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub date: NaiveDateTime,
    pub total_loc: u64,
    /// One value per entry of [`AggregatedSeries::languages`], same order.
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub languages: Vec<String>,
    pub rows: Vec<AggregatedRow>,
}

impl AggregatedSeries {
    pub fn value(&self, row: &AggregatedRow, language: &str) -> Option<u64> {
        let idx = self.languages.iter().position(|l| l == language)?;
        row.values.get(idx).copied()
    }

    pub fn row_for(&self, date: &NaiveDateTime) -> Option<&AggregatedRow> {
        self.rows.iter().find(|r| &r.date == date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub inputs: Vec<String>,
    pub series: AggregatedSeries,
}

pub const SCHEMA_VERSION: u32 = 1;
