use crate::cli::CommonArgs;
use crate::error::{LocError, Result};

pub const DEFAULT_REPOS: [&str; 5] = ["AgentWorks", "aiserver", "ASTMApp", "HDFTools", "FlaskHDF"];

/// Settings shared by every command that talks to remote repositories.
///
/// Built once at startup and passed down explicitly.
#[derive(Clone)]
pub struct Config {
    pub github_user: String,
    github_token: String,
    pub repos: Vec<String>,
    pub remote_base: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github_user", &self.github_user)
            .field("github_token", &"<redacted>")
            .field("repos", &self.repos)
            .field("remote_base", &self.remote_base)
            .finish()
    }
}

impl Config {
    pub fn from_args(common: &CommonArgs) -> Result<Self> {
        let github_user = required("GITHUB_USER", common.github_user.as_deref())?;
        let github_token = required("GITHUB_TOKEN", common.github_token.as_deref())?;
        let repos = parse_repo_list(common.repos.as_deref(), &github_user);
        let remote_base = common
            .remote_base
            .as_deref()
            .map(|b| b.trim().trim_end_matches('/').to_string())
            .filter(|b| !b.is_empty());

        Ok(Self {
            github_user,
            github_token,
            repos,
            remote_base,
        })
    }

    /// Clone URL for an `owner/name` identifier. Contains the token, never log it.
    pub fn clone_url(&self, repo: &str) -> String {
        match &self.remote_base {
            Some(base) => format!("{base}/{repo}.git"),
            None => format!("https://{}@github.com/{repo}.git", self.github_token),
        }
    }
}

fn required(name: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(LocError::Config(format!(
            "required setting '{name}' is not set (environment, .env file, or command line)"
        ))),
    }
}

/// Comma-separated list, falling back to [`DEFAULT_REPOS`]. Bare names are owned by `user`.
pub fn parse_repo_list(value: Option<&str>, user: &str) -> Vec<String> {
    let names: Vec<&str> = value
        .map(|v| v.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let names = if names.is_empty() {
        DEFAULT_REPOS.to_vec()
    } else {
        names
    };

    names
        .into_iter()
        .map(|name| {
            if name.contains('/') {
                name.to_string()
            } else {
                format!("{user}/{name}")
            }
        })
        .collect()
}
