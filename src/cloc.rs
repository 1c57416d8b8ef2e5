use crate::error::{LocError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Entries of cloc's JSON report that are not languages.
const META_KEYS: [&str; 2] = ["header", "SUM"];

/// Code lines per language for one working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCount {
    pub languages: BTreeMap<String, u64>,
}

impl LineCount {
    pub fn total(&self) -> u64 {
        self.languages.values().sum()
    }
}

pub trait LineCounter {
    fn count(&self, dir: &Path) -> Result<LineCount>;
}

#[derive(Deserialize)]
struct ClocLanguage {
    code: u64,
}

/// Runs the `cloc` executable.
#[derive(Debug, Clone)]
pub struct Cloc {
    program: PathBuf,
}

impl Cloc {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// `./cloc.exe` when it sits in the current directory, otherwise `cloc` from `PATH`.
    pub fn locate() -> Self {
        let local = Path::new("cloc.exe");
        if local.exists() {
            Self::new(local)
        } else {
            Self::new("cloc")
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl LineCounter for Cloc {
    fn count(&self, dir: &Path) -> Result<LineCount> {
        let output = Command::new(&self.program)
            .arg("--json")
            .arg("--quiet")
            .arg(dir)
            .output()
            .map_err(|e| {
                LocError::Counter(format!("failed to run {}: {e}", self.program.display()))
            })?;

        if !output.status.success() {
            return Err(LocError::Counter(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }

        parse_report(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse cloc's `--json` report. No output at all means nothing was countable.
pub fn parse_report(json: &str) -> Result<LineCount> {
    if json.trim().is_empty() {
        return Ok(LineCount::default());
    }

    let report: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| LocError::Counter(format!("unreadable cloc report: {e}")))?;

    let mut languages = BTreeMap::new();
    for (name, value) in report {
        if META_KEYS.contains(&name.as_str()) {
            continue;
        }
        let entry: ClocLanguage = serde_json::from_value(value)
            .map_err(|e| LocError::Counter(format!("bad cloc entry for {name}: {e}")))?;
        languages.insert(name, entry.code);
    }

    Ok(LineCount { languages })
}
