//! Thin wrappers over the `git` executable for the operations gix does not cover
//! on a working tree: cloning, checkout, annotated tags and pushing.

use crate::error::{LocError, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

pub fn clone_repository(url: &str, target: &Path, clean: bool) -> Result<()> {
    if clean && target.exists() {
        std::fs::remove_dir_all(target)?;
    }
    run_git(
        None,
        [OsStr::new("clone"), OsStr::new("--quiet"), OsStr::new(url), target.as_os_str()],
        "clone",
    )
}

pub fn checkout(dir: &Path, rev: &str) -> Result<()> {
    run_git(Some(dir), ["checkout", "--quiet", "--force", rev], "checkout")
}

pub fn create_tag(dir: &Path, name: &str, message: &str) -> Result<()> {
    run_git(Some(dir), ["tag", "-a", name, "-m", message], "tag")
}

pub fn push_tag(dir: &Path, name: &str, remote: &str) -> Result<()> {
    run_git(Some(dir), ["push", "--quiet", remote, name], "push")
}

fn run_git<I, S>(dir: Option<&Path>, args: I, action: &str) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new("git");
    if let Some(dir) = dir {
        cmd.arg("-C").arg(dir);
    }
    let output = cmd
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| LocError::GitCommand(format!("git {action}: failed to start git: {e}")))?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or("no error output");
    Err(LocError::GitCommand(format!(
        "git {action} exited with {}: {}",
        output.status,
        redact_credentials(detail)
    )))
}

/// Strip `user:secret@` from any URL embedded in `text`.
pub fn redact_credentials(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("://") {
        let (head, tail) = rest.split_at(pos + 3);
        out.push_str(head);
        let authority_end = tail
            .find(|c: char| c == '/' || c.is_whitespace() || c == '\'' || c == '"')
            .unwrap_or(tail.len());
        match tail[..authority_end].rfind('@') {
            Some(at) => rest = &tail[at + 1..],
            None => rest = tail,
        }
    }
    out.push_str(rest);
    out
}
