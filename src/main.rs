mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;

use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use models::ProfileKind;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .init();

    if let Some(Commands::Init) = cli.command {
        return init(cli.config);
    }

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `windwatch init` or copy config/config.yaml.example to config/config.yaml");
            std::process::exit(1);
        }
    };

    let app = App::new(config)?;

    match cli.command {
        None | Some(Commands::Run) => run(&app).await,
        Some(Commands::Once { profile }) => once(&app, profile.into()).await,
        Some(Commands::Check) => check(&app).await,
        Some(Commands::Init) => Ok(()),
    }
}

fn init(config_override: Option<PathBuf>) -> Result<()> {
    let path = match config_override {
        Some(p) => p,
        None => Config::default_config_path()?,
    };
    Config::write_default(&path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn run(app: &App) -> Result<()> {
    let cancel = CancellationToken::new();

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    app.run(cancel).await
}

async fn once(app: &App, kind: ProfileKind) -> Result<()> {
    let outcome = app.run_once(kind).await?;
    println!(
        "{} cycle: {} forecast days, summarized: {}, delivered: {}, failed: {}",
        kind,
        outcome.forecast_days,
        if outcome.summarized { "yes" } else { "no" },
        outcome.delivered,
        outcome.failed
    );
    Ok(())
}

async fn check(app: &App) -> Result<()> {
    let config = app.config();
    for (kind, enabled, schedule) in [
        (ProfileKind::Wind, config.wind.enabled, config.wind.schedule),
        (ProfileKind::Rain, config.rain.enabled, config.rain.schedule),
    ] {
        if enabled {
            println!("{}: daily at {}", kind, schedule);
        } else {
            println!("{}: disabled", kind);
        }
    }

    let status = app.check_connections().await;
    let label = |ok: bool| if ok { "OK" } else { "OFFLINE" };
    println!(
        "Ollama ({} at {}): {}",
        app.ollama_model(),
        config.ollama.host,
        label(status.ollama)
    );
    match status.telegram {
        Some(ok) => println!("Telegram: {}", label(ok)),
        None => println!("Telegram: not configured"),
    }

    if !status.all_connected() {
        std::process::exit(1);
    }
    Ok(())
}
