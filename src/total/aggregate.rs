use crate::model::{anchor_date, AggregatedRow, AggregatedSeries, RepositorySeries};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

struct DateAccum {
    total_loc: u64,
    values: Vec<u64>,
}

impl DateAccum {
    fn new(columns: usize) -> Self {
        Self {
            total_loc: 0,
            values: vec![0; columns],
        }
    }
}

/// Sorted union of every language named by any series or carried by any record.
pub fn discover_languages(series: &[RepositorySeries]) -> Vec<String> {
    let mut languages: BTreeSet<&str> = BTreeSet::new();
    for s in series {
        languages.extend(s.languages.iter().map(String::as_str));
        for record in &s.records {
            languages.extend(record.per_language_loc.keys().map(String::as_str));
        }
    }
    languages.into_iter().map(str::to_string).collect()
}

/// Merge per-repository series into one series keyed by date.
///
/// Values reported on the same date are summed across repositories. Records at the
/// anchor date are ignored; the output instead opens with a single all-zero anchor row,
/// followed by every other date in ascending order. Each row has one value per
/// language column, `0` where nothing was reported.
pub fn aggregate(series: &[RepositorySeries]) -> AggregatedSeries {
    let languages = discover_languages(series);
    let anchor = anchor_date();

    let mut buckets: BTreeMap<NaiveDateTime, DateAccum> = BTreeMap::new();
    for s in series {
        for record in s.records.iter().filter(|r| r.date != anchor) {
            let accum = buckets
                .entry(record.date)
                .or_insert_with(|| DateAccum::new(languages.len()));
            accum.total_loc += record.total_loc;
            for (value, language) in accum.values.iter_mut().zip(&languages) {
                *value += record.language_loc(language);
            }
        }
    }

    let mut rows = Vec::with_capacity(buckets.len() + 1);
    rows.push(AggregatedRow {
        date: anchor,
        total_loc: 0,
        values: vec![0; languages.len()],
    });
    rows.extend(buckets.into_iter().map(|(date, accum)| AggregatedRow {
        date,
        total_loc: accum.total_loc,
        values: accum.values,
    }));

    AggregatedSeries { languages, rows }
}
