use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use yomu_config::Config;
use yomu_config::profile::init_profiles;

pub mod controller;
pub mod events;
pub mod io;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;
use self::ui::{TerminalPane, pane_writer};

/// Streams AI explanations for dictionary lookups read from stdin
#[derive(Debug, Parser)]
#[command(name = "yomu", version)]
struct Args {
    /// Settings profile to load
    #[arg(long)]
    profile: Option<String>,

    /// Directory holding `<profile>.json` files
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    /// Hard timeout for one AI request
    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(profile) = &self.profile {
            config.profile = profile.clone();
        }
        if let Some(dir) = &self.profile_dir {
            config.profile_dir = dir.clone();
        }
        if let Some(seconds) = self.timeout_seconds {
            config.explainer.timeout_seconds = seconds;
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Logs go to stderr, stdout belongs to the pane
    if json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(args.log_json);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run(args));
    runtime.shutdown_timeout(Duration::from_secs(1));

    result
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::new();
    args.apply(&mut config);

    init_profiles(&config.profile_dir).await?;

    let (pane, views) = TerminalPane::stdout();
    let writer = tokio::spawn(async move { pane_writer(&mut tokio::io::stdout(), views).await });

    let state = Arc::new(AppState::new(config, Box::new(pane)));
    let controller = AppController::new(state).await;
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task exited with error: {}", e),
                Err(e) => tracing::error!("Task panicked: {}", e),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::warn!("Task exited with error during shutdown: {}", e);
        }
    }

    // Last pane handle goes with the session, which ends the writer
    drop(controller);
    match tokio::time::timeout(Duration::from_secs(1), writer).await {
        Ok(Ok(Err(e))) => tracing::warn!("Pane writer failed: {}", e),
        Ok(Err(e)) => tracing::error!("Pane writer panicked: {}", e),
        Err(_) => tracing::warn!("Pane writer did not finish in time"),
        Ok(Ok(Ok(()))) => {}
    }

    Ok(())
}
