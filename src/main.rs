use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use expdump::{config, pipeline, Config, Fetcher};
use reqwest::Client;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Download every experiment and dataset of a project as one CSV per item.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Bearer token for the API
    #[arg(long, env = "EXPDUMP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Project whose experiments and datasets are downloaded
    #[arg(long, env = "EXPDUMP_PROJECT_ID")]
    project_id: Option<String>,

    /// API root; requests go to `<base-url>/<project-id>/<category>`
    #[arg(long, env = "EXPDUMP_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Parent of the timestamped output directory
    #[arg(long, default_value = config::DEFAULT_OUTPUT_ROOT)]
    output_root: PathBuf,

    /// Write straight into this directory instead of a timestamped one
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let args = Args::parse();
    let cfg = Config::new(
        &args.base_url,
        args.project_id,
        args.api_key,
        &args.output_root,
        args.output_dir,
        Local::now(),
    )
    .context("invalid configuration")?;
    info!(project = %cfg.project_id, base_url = %cfg.base_url, "startup");

    // ─── 3) fetch & write ────────────────────────────────────────────
    println!("Saving files to: {}", cfg.output_dir.display());
    let fetcher = Fetcher::new(Client::new(), &cfg);

    match pipeline::run(&fetcher, &cfg.output_dir).await {
        Ok(summary) => {
            for (category, files) in &summary.written {
                info!("{}: {} files", category, files.len());
            }
            Ok(())
        }
        Err(e) => {
            error!("run failed: {}", e);
            Err(e).with_context(|| format!("downloading project {}", cfg.project_id))
        }
    }
}
