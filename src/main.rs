use clap::Parser;
use colored::Colorize;
use ghrun::api::GithubApi;
use ghrun::cache::DiskCache;
use ghrun::error::GhrunError;
use ghrun::reference::RepoReference;
use ghrun::{pipeline, runner};

#[derive(Parser)]
#[command(name = "ghrun")]
#[command(author, version, about = "Run prebuilt binaries straight from GitHub releases", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Suppress download progress output
    #[arg(short, long)]
    quiet: bool,

    /// Repository reference: github.com/<owner>/<repo>[@version]
    reference: String,

    /// Arguments forwarded to the resolved binary
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ghrun::Result<()> {
    let reference = RepoReference::parse(&cli.reference)?;
    let api = GithubApi::new()?;
    let cache = DiskCache::new();

    let binary = pipeline::resolve_binary(&api, &cache, &reference, cli.quiet).await?;
    let code = runner::run_binary(&binary, &cli.args).await?;

    if code != 0 {
        return Err(GhrunError::NonZeroExit(code));
    }
    Ok(())
}
