use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn has_cloc() -> bool {
    Command::new("cloc")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    git_with_env(dir, args, &[])
}

fn git_with_env(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> String {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(envs.iter().copied())
        .env("GIT_AUTHOR_NAME", "Your Name")
        .env("GIT_AUTHOR_EMAIL", "you@example.com")
        .env("GIT_COMMITTER_NAME", "Your Name")
        .env("GIT_COMMITTER_EMAIL", "you@example.com")
        .output()
        .unwrap();
    assert!(out.status.success(), "git {args:?} failed: {}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init", "--quiet"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn commit_file(dir: &Path, name: &str, content: &str, date: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
    git_with_env(
        dir,
        &["commit", "--quiet", "-m", &format!("add {name}")],
        &[("GIT_AUTHOR_DATE", date), ("GIT_COMMITTER_DATE", date)],
    );
}

/// A bare repository at `<base>/<owner>/<name>.git` seeded with `files`.
fn bare_remote(base: &Path, owner: &str, name: &str, files: &[(&str, &str)]) {
    let work = base.join("seed").join(name);
    fs::create_dir_all(&work).unwrap();
    init_git_repo(&work);
    // one day apart so every commit lands on its own date
    for (day, (file, content)) in files.iter().enumerate() {
        let date = format!("2025-01-{:02}T12:00:00Z", day + 1);
        commit_file(&work, file, content, &date);
    }
    let target = base.join(owner).join(format!("{name}.git"));
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    git(
        base,
        &["clone", "--quiet", "--bare", work.to_str().unwrap(), target.to_str().unwrap()],
    );
}

fn locgrowth(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("locgrowth").unwrap();
    cmd.current_dir(cwd)
        .env_remove("GITHUB_USER")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_REPOS")
        .env_remove("GITHUB_REMOTE_BASE")
        .env("GIT_COMMITTER_NAME", "Release Bot")
        .env("GIT_COMMITTER_EMAIL", "bot@example.com")
        .env("GIT_AUTHOR_NAME", "Release Bot")
        .env("GIT_AUTHOR_EMAIL", "bot@example.com");
    cmd
}

#[test]
fn total_merges_series_files_in_directory() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("code_growth-alpha.csv"),
        "repo_name,commit_hash,datetime,author,lines_of_code,delta,Rust\n\
         alpha,initial,2024-11-01 00:00:00,N/A,0,0,0\n\
         alpha,1111111,2024-11-03 12:00:00,Dev,40,40,40\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("code_growth-beta.csv"),
        "repo_name,commit_hash,datetime,author,lines_of_code,delta,Python\n\
         beta,initial,2024-11-01 00:00:00,N/A,0,0,0\n\
         beta,2222222,2024-11-03 12:00:00,Dev,2,2,2\n\
         beta,3333333\n",
    )
    .unwrap();
    // neither of these is a per-repository series
    fs::write(dir.path().join("code_growth.csv"), "garbage\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "hello\n").unwrap();

    locgrowth(dir.path()).args(["total", "--dir", "."]).assert().success();

    let total = fs::read_to_string(dir.path().join("code_growth_total.csv")).unwrap();
    assert_eq!(
        total,
        "date,total_loc,Python,Rust\n\
         2024-11-01 00:00:00,0,0,0\n\
         2024-11-03 12:00:00,42,2,40\n"
    );
}

#[test]
fn total_without_inputs_writes_anchor_only() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.csv");

    locgrowth(dir.path())
        .args(["total", "--dir", "."])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out).unwrap(),
        "date,total_loc\n2024-11-01 00:00:00,0\n"
    );
}

#[test]
fn total_json_reports_rows() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("code_growth-alpha.csv"),
        "repo_name,commit_hash,datetime,author,lines_of_code,delta,Rust\n\
         alpha,1111111,2024-11-03 12:00:00,Dev,40,40,40\n",
    )
    .unwrap();

    let out = locgrowth(dir.path())
        .args(["total", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(v["series"]["languages"][0], "Rust");
    assert_eq!(v["series"]["rows"].as_array().map(|r| r.len()), Some(2));
    assert_eq!(v["series"]["rows"][1]["total_loc"], 40);
}

#[test]
fn collect_requires_credentials() {
    let dir = tempdir().unwrap();

    let out = locgrowth(dir.path())
        .args(["collect"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    assert!(String::from_utf8_lossy(&out).contains("GITHUB_USER"));
    assert!(!dir.path().join("code_growth_total.csv").exists());
}

#[test]
fn tag_requires_credentials() {
    let dir = tempdir().unwrap();

    let out = locgrowth(dir.path())
        .args(["--github-user", "me", "tag", "--tag", "v1"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    assert!(String::from_utf8_lossy(&out).contains("GITHUB_TOKEN"));
}

#[test]
fn tag_creates_and_pushes_annotated_tags() {
    if !has_git() {
        return;
    }
    let base = tempdir().unwrap();
    let work = tempdir().unwrap();
    bare_remote(base.path(), "me", "tools", &[("src/lib.rs", "pub fn a() {}\n")]);

    locgrowth(work.path())
        .args(["--github-user", "me", "--github-token", "unused"])
        .args(["--repos", "tools,missing"])
        .arg("--remote-base")
        .arg(base.path())
        .args(["tag", "--tag", "v1.2.0", "--workdir", "."])
        .assert()
        .success();

    let remote = base.path().join("me").join("tools.git");
    assert_eq!(git(&remote, &["tag", "-l"]).trim(), "v1.2.0");
    assert_eq!(git(&remote, &["cat-file", "-t", "v1.2.0"]).trim(), "tag");
    assert!(git(&remote, &["tag", "-l", "-n1", "v1.2.0"]).contains("Tagging release v1.2.0"));
}

#[test]
fn collect_writes_series_combined_and_total() {
    if !has_git() || !has_cloc() {
        return;
    }
    let base = tempdir().unwrap();
    let out = tempdir().unwrap();
    bare_remote(
        base.path(),
        "me",
        "tools",
        &[
            ("src/lib.rs", "pub fn a() -> u32 {\n    1\n}\n"),
            ("src/main.rs", "fn main() {\n    println!(\"hi\");\n}\n"),
        ],
    );

    locgrowth(out.path())
        .args(["--github-user", "me", "--github-token", "unused", "--quiet"])
        .args(["--repos", "tools,missing"])
        .arg("--remote-base")
        .arg(base.path())
        .args(["collect", "--out-dir", "."])
        .assert()
        .success();

    let series = fs::read_to_string(out.path().join("code_growth-tools.csv")).unwrap();
    let lines: Vec<&str> = series.lines().collect();
    assert_eq!(lines[0], "repo_name,commit_hash,datetime,author,lines_of_code,delta,Rust");
    assert_eq!(lines[1], "tools,initial,2024-11-01 00:00:00,N/A,0,0,0");
    assert_eq!(lines.len(), 4);
    assert!(lines[2].ends_with(",3,3,3"));
    assert!(lines[3].ends_with(",6,3,6"));

    let combined = fs::read_to_string(out.path().join("code_growth.csv")).unwrap();
    assert_eq!(combined, series);

    let total = fs::read_to_string(out.path().join("code_growth_total.csv")).unwrap();
    let total: Vec<&str> = total.lines().collect();
    assert_eq!(total[0], "date,total_loc,Rust");
    assert_eq!(total[1], "2024-11-01 00:00:00,0,0");
    assert!(total.last().unwrap().ends_with(",6,6"));
}

#[test]
fn tag_reads_the_tag_name_from_stdin() {
    if !has_git() {
        return;
    }
    let base = tempdir().unwrap();
    let work = tempdir().unwrap();
    bare_remote(base.path(), "me", "tools", &[("src/lib.rs", "pub fn a() {}\n")]);

    let mut cmd = locgrowth(work.path());
    cmd.args(["--github-user", "me", "--github-token", "unused", "--repos", "tools"])
        .arg("--remote-base")
        .arg(base.path())
        .args(["tag", "--workdir", "."]);
    assert_cmd::Command::from_std(cmd)
        .write_stdin("v9.9.9\n")
        .assert()
        .success();

    let remote = base.path().join("me").join("tools.git");
    assert_eq!(git(&remote, &["tag", "-l"]).trim(), "v9.9.9");
}

#[test]
fn collect_with_only_unreachable_repos_writes_anchor_only_total() {
    let base = tempdir().unwrap();
    let out = tempdir().unwrap();

    locgrowth(out.path())
        .args(["--github-user", "me", "--github-token", "unused", "--quiet"])
        .args(["--repos", "missing"])
        .arg("--remote-base")
        .arg(base.path())
        .args(["collect", "--out-dir", "."])
        .assert()
        .success();

    assert!(!out.path().join("code_growth-missing.csv").exists());
    assert_eq!(
        fs::read_to_string(out.path().join("code_growth_total.csv")).unwrap(),
        "date,total_loc\n2024-11-01 00:00:00,0\n"
    );
}

#[cfg(unix)]
#[test]
fn collect_uses_the_given_cloc_program() {
    use std::os::unix::fs::PermissionsExt;

    if !has_git() {
        return;
    }
    let base = tempdir().unwrap();
    let out = tempdir().unwrap();
    let bin = tempdir().unwrap();
    bare_remote(
        base.path(),
        "me",
        "tools",
        &[("src/lib.rs", "pub fn a() {}\n"), ("README.md", "tools\n")],
    );

    let fake_cloc = bin.path().join("fake-cloc");
    fs::write(
        &fake_cloc,
        "#!/bin/sh\n\
         echo '{\"header\":{\"cloc_version\":\"2.00\"},\"Rust\":{\"nFiles\":1,\"blank\":0,\"comment\":0,\"code\":5},\"SUM\":{\"code\":5}}'\n",
    )
    .unwrap();
    fs::set_permissions(&fake_cloc, fs::Permissions::from_mode(0o755)).unwrap();

    locgrowth(out.path())
        .args(["--github-user", "me", "--github-token", "unused", "--quiet"])
        .args(["--repos", "tools"])
        .arg("--remote-base")
        .arg(base.path())
        .args(["collect", "--out-dir", "."])
        .arg("--cloc")
        .arg(&fake_cloc)
        .assert()
        .success();

    let series = fs::read_to_string(out.path().join("code_growth-tools.csv")).unwrap();
    let lines: Vec<&str> = series.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "repo_name,commit_hash,datetime,author,lines_of_code,delta,Rust");
    assert_eq!(lines[1], "tools,initial,2024-11-01 00:00:00,N/A,0,0,0");
    assert!(lines[2].ends_with(",5,5,5"), "{}", lines[2]);
    assert!(lines[3].ends_with(",5,0,5"), "{}", lines[3]);

    let combined = fs::read_to_string(out.path().join("code_growth.csv")).unwrap();
    assert_eq!(combined, series);

    let total = fs::read_to_string(out.path().join("code_growth_total.csv")).unwrap();
    let total: Vec<&str> = total.lines().collect();
    assert_eq!(total.len(), 4);
    assert_eq!(total[0], "date,total_loc,Rust");
    assert_eq!(total[1], "2024-11-01 00:00:00,0,0");
    assert!(total[2].ends_with(",5,5"));
    assert!(total[3].ends_with(",5,5"));
}
