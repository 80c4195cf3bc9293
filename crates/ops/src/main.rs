use clap::Parser;
use std::path::PathBuf;

use jarvis_ops::{OpsState, app};
use jarvis_runtime_config::JarvisConfig;

#[derive(Parser)]
#[command(name = "jarvis-ops", about = "JARVIS management API")]
struct Cli {
    /// Path to jarvis.toml (defaults to $JARVIS_CONFIG, then ./jarvis.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jarvis_ops=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = JarvisConfig::load(cli.config.as_deref())?;
    let port = cli.port.unwrap_or(cfg.ops.port);

    let state = OpsState::new(&cfg.ops.data_dir, &cfg.ops.orchestrator_url)?;

    tracing::info!(
        "management API on port {port}, orchestrator at {}",
        cfg.ops.orchestrator_url
    );
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
