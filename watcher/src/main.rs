//! Homework status watcher.
//!
//! Polls the Practicum API every few minutes and forwards review status changes
//! to a Telegram chat. Needs `PRACTICUM_TOKEN`, `TELEGRAM_TOKEN` and
//! `TELEGRAM_CHAT_ID` in the environment or a `.env` file.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use common::{ConfigError, Credentials};
use practicum::PracticumClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use telegram::TelegramNotifier;
use tracing::{error, info};

mod logging;
mod poller;

use poller::StatusPoller;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seconds to sleep between polls.
    #[arg(long, default_value_t = 600)]
    interval_secs: u64,
    #[arg(long, default_value = practicum::ENDPOINT)]
    endpoint: String,
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
    /// Also write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    logging::init(&args.log_level, args.log_file.as_deref())?;

    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            let ConfigError::MissingVariables(names) = &e;
            for name in names {
                error!(variable = %name, "Required environment variable is missing");
            }
            error!("{}; the watcher will not start", e);
            return Err(e.into());
        }
    };

    let api = PracticumClient::new(
        &credentials.practicum_token,
        &args.endpoint,
        Duration::from_secs(args.request_timeout_secs),
    )
    .context("Failed to build API client")?;
    let notifier = TelegramNotifier::new(&credentials.telegram_token, &credentials.telegram_chat_id);

    info!(
        endpoint = %api.endpoint(),
        interval_secs = args.interval_secs,
        "Homework watcher v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let poller = StatusPoller::new(
        Arc::new(api),
        Arc::new(notifier),
        Duration::from_secs(args.interval_secs),
        Utc::now().timestamp(),
    );
    poller.run(shutdown_signal()).await;

    info!("Homework watcher stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, shutting down");
}
