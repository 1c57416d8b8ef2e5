use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::{LocError, Result};
use crate::git::command;
use crate::report::RunReport;
use crate::util::short_name;
use console::{style, Term};
use std::io::BufRead;
use std::path::Path;

pub fn tag_message(tag: &str) -> String {
    format!("Tagging release {tag}")
}

pub fn exec(common: &CommonArgs, tag: Option<String>, workdir: &Path, remote: &str) -> anyhow::Result<()> {
    let config = Config::from_args(common)?;
    println!("Repositories to tag: {}", config.repos.join(", "));

    let tag = match tag {
        Some(t) => t,
        None => prompt_tag_name()?,
    };
    let tag = tag.trim().to_string();
    if tag.is_empty() {
        return Err(LocError::Config("tag name must not be empty".to_string()).into());
    }

    std::fs::create_dir_all(workdir)?;
    let report = tag_all(&config, &tag, workdir, remote);
    report.print_summary(&format!("Release {tag}"));
    Ok(())
}

/// Ask on the terminal; the answer is read from stdin so it can also be piped in.
fn prompt_tag_name() -> Result<String> {
    let term = Term::stdout();
    term.write_str("Enter tag name: ")?;
    term.flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Clone, tag and push each repository independently; failures only skip that repository.
pub fn tag_all(config: &Config, tag: &str, workdir: &Path, remote: &str) -> RunReport {
    let message = tag_message(tag);
    let mut report = RunReport::new();

    for repo in &config.repos {
        tracing::info!(repo = repo.as_str(), tag, "tagging");
        match tag_repository(config, repo, tag, &message, workdir, remote) {
            Ok(()) => {
                println!("Tagged and pushed {} with {}", style(repo).bold(), style(tag).green());
                report.record_success(repo.as_str());
            }
            Err(e) => report.record_failure(repo.as_str(), e),
        }
    }

    report
}

fn tag_repository(
    config: &Config,
    repo: &str,
    tag: &str,
    message: &str,
    workdir: &Path,
    remote: &str,
) -> Result<()> {
    let dir = workdir.join(short_name(repo));
    command::clone_repository(&config.clone_url(repo), &dir, true)?;
    command::create_tag(&dir, tag, message)?;
    command::push_tag(&dir, tag, remote)
}
