use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use navgpt_cli::app;

#[derive(Parser)]
#[command(name = "navgpt")]
#[command(about = "NavGPT - terminal chat client")]
#[command(version)]
struct Cli {
    /// Send a single message and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Base URL of the text-generation endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory for persisted preferences and conversations
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is configured from the settings, so a bad config file can only
    // be reported once the subscriber is up.
    let config_path = navgpt_core::Settings::config_path();
    let (mut settings, config_error) = match navgpt_core::Settings::try_load_from(&config_path) {
        Ok(settings) => (settings, None),
        Err(e) => (navgpt_core::Settings::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_error {
        tracing::warn!("Ignoring config {}: {e}", config_path.display());
    }

    if let Some(endpoint) = cli.endpoint {
        settings.relay.base_url = endpoint;
    }
    if let Some(data_dir) = cli.data_dir {
        settings.storage.data_dir = Some(data_dir);
    }

    let snapshots = app::open_snapshots(&settings, cli.ephemeral)?;

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(&settings, snapshots, &prompt).await?;
    } else {
        app::run_repl(&settings, snapshots).await?;
    }

    Ok(())
}
