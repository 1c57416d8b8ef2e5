use anyhow::Result;
use locgrowth::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // a missing .env is fine, settings may come from the environment or flags
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.execute()
}
