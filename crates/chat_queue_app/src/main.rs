mod app;
mod cli;
mod config;
mod render;
mod sim_host;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chat_queue_engine::QueueHandle;
use clap::Parser;
use log::LevelFilter;
use queue_logging::queue_info;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::sim_host::SimulatedHost;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level()?
    };
    queue_logging::initialize(config.log_destination(), level);

    let host = Arc::new(SimulatedHost::new(
        Duration::from_millis(config.reply_delay_ms),
        config.host_events,
    ));
    let (queue, runner) = QueueHandle::spawn(host, config.runner_settings());

    app::enqueue_inputs(&queue, cli.inputs());
    let snapshot = app::run_to_completion(&queue).await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("serializing queue snapshot")?
        );
    }

    queue.shutdown();
    runner.await.context("queue runner panicked")?;
    queue_info!(
        "Finished: {} done, {} failed, {} pending",
        snapshot.done_count,
        snapshot.error_count,
        snapshot.pending_count
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}
