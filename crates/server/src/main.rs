use clap::Parser;
use std::path::PathBuf;

use jarvis_runtime_config::JarvisConfig;
use jarvis_server::{AppState, app};

#[derive(Parser)]
#[command(name = "jarvis-server", about = "JARVIS dashboard REST API")]
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
                .unwrap_or_else(|_| "jarvis_server=info,jarvis_core=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = JarvisConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }

    let state = AppState::new(&cfg)?;
    let app = app(state, Some(&cfg.server.web_dir));

    tracing::info!("starting server at {}", cfg.server.base_url);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.server.port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
