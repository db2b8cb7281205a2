use std::path::PathBuf;

use anyhow::Context;
use asset_fetch::{
    config::{Config, Settings},
    fetch::HttpTransport,
    run_batch, EmptyBodyPolicy, Fetcher, Manifest,
};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser, Debug)]
#[command(name = "fetch-assets", about = "Download the textures and models listed in resources.json that are not on disk yet")]
struct Cli {
    /// Resources root that manifest destinations are relative to
    #[arg(long)]
    resources_dir: Option<PathBuf>,

    /// Manifest path (defaults to <resources-dir>/resources.json)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Optional path to a config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// What to do when a download comes back empty
    #[arg(long, value_enum)]
    on_empty: Option<EmptyBodyPolicy>,

    /// Whole-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "warn,asset_fetch=debug,fetch_assets=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file_cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let overrides = Config {
        resources_dir: cli.resources_dir,
        manifest: cli.manifest,
        on_empty: cli.on_empty,
        timeout_secs: cli.timeout_secs,
    };
    let settings = Settings::resolve(overrides, file_cfg);
    log::debug!("{:?}", settings);

    let manifest = Manifest::load(&settings.manifest)?;
    let descriptors = manifest.descriptors(&settings.resources_dir);

    let progress = ProgressBar::new(descriptors.len() as u64)
        .with_style(ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len}")?);
    let transport = HttpTransport::new(settings.timeout)?;
    let fetcher = Fetcher::new(transport)
        .with_empty_body_policy(settings.on_empty)
        .with_progress(progress);

    let summary = run_batch(&fetcher, &descriptors)
        .await
        .with_context(|| format!("fetching assets listed in {}", settings.manifest.display()))?;
    println!(
        "{} resources: {} downloaded, {} already present, {} empty",
        summary.total(),
        summary.saved,
        summary.skipped,
        summary.empty
    );
    Ok(())
}
