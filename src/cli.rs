use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locgrowth")]
#[command(about = "Per-commit lines-of-code growth across a set of git repositories")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, env = "GITHUB_USER", help = "GitHub user owning the repositories")]
    pub github_user: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub access token used for cloning")]
    pub github_token: Option<String>,

    #[arg(long, env = "GITHUB_REPOS", help = "Comma-separated repositories (name or owner/name)")]
    pub repos: Option<String>,

    #[arg(long, env = "GITHUB_REMOTE_BASE", help = "Clone from <base>/<owner>/<name>.git instead of GitHub")]
    pub remote_base: Option<String>,

    #[arg(long, help = "Hide progress bars", default_value_t = false)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk every repository's history and write per-commit LOC series
    Collect {
        #[arg(long, default_value = ".", help = "Directory for the generated CSV files")]
        out_dir: PathBuf,

        #[arg(long, help = "Path to the cloc executable")]
        cloc: Option<PathBuf>,

        #[arg(long, help = "Print the aggregated series as JSON")]
        json: bool,
    },
    /// Merge code_growth-*.csv files into one total growth series
    Total {
        #[arg(long, default_value = ".", help = "Directory containing code_growth-*.csv files")]
        dir: PathBuf,

        #[arg(long, help = "Output file (default: <dir>/code_growth_total.csv)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Print the aggregated series as JSON")]
        json: bool,
    },
    /// Create and push an annotated release tag in every repository
    Tag {
        #[arg(long, help = "Tag name (prompted for when omitted)")]
        tag: Option<String>,

        #[arg(long, default_value = ".", help = "Directory the repositories are cloned into")]
        workdir: PathBuf,

        #[arg(long, default_value = "origin", help = "Remote to push the tag to")]
        remote: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Collect { out_dir, cloc, json } => {
                crate::collect::exec(&self.common, &out_dir, cloc, json)
            }
            Commands::Total { dir, output, json } => crate::total::exec(&dir, output, json),
            Commands::Tag { tag, workdir, remote } => {
                crate::tag::exec(&self.common, tag, &workdir, &remote)
            }
        }
    }
}
