use console::style;
use serde::Serialize;
use std::fmt::Display;

/// A unit of work (a repository, a commit) that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub unit: String,
    pub reason: String,
}

impl UnitFailure {
    pub fn new(unit: impl Into<String>, reason: impl Display) -> Self {
        Self {
            unit: unit.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<UnitFailure>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, unit: impl Into<String>) {
        self.succeeded.push(unit.into());
    }

    pub fn record_failure(&mut self, unit: impl Into<String>, reason: impl Display) {
        let failure = UnitFailure::new(unit, reason);
        tracing::warn!(unit = %failure.unit, reason = %failure.reason, "skipped");
        self.failed.push(failure);
    }

    pub fn print_summary(&self, title: &str) {
        println!("\n{}", style(title).bold());
        println!("{}", "─".repeat(50));
        println!("Succeeded: {}", style(self.succeeded.len()).green());
        for unit in &self.succeeded {
            println!("  {unit}");
        }
        println!("Failed:    {}", style(self.failed.len()).red());
        for failure in &self.failed {
            println!("  {}: {}", failure.unit, style(&failure.reason).dim());
        }
    }
}
