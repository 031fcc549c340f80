//! sec-filing-alerts binary entrypoint.
//! Loads the watch list, resolves it against the registry directory, then
//! polls for same-day filings until the daily window closes.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use sec_filing_alerts::{
    init_tracing, EmailNotifier, LogNotifier, Metrics, MonitorConfig, MonitorError,
    MonitorSession, Notifier, PollWindow, RegistryClient, SystemClock,
};

#[derive(Parser)]
#[command(name = "sec-filing-alerts")]
#[command(about = "Email an alert when a watched company files with the SEC today")]
struct Cli {
    /// Recipient address for alerts
    #[arg(long, env = "NOTIFY_EMAIL_TO")]
    to: String,

    /// Sender address (also the SMTP login)
    #[arg(long, env = "NOTIFY_EMAIL_FROM")]
    from: String,

    /// SMTP password or app password for the sender
    #[arg(long, env = "SMTP_PASS", hide_env_values = true)]
    password: String,

    /// TOML config file (defaults to $FILING_MONITOR_CONFIG, then config/monitor.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the watch-list file (defaults to the executable's directory)
    #[arg(long)]
    watchlist_dir: Option<PathBuf>,

    /// Log alerts instead of sending email
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => MonitorConfig::load_from(path),
        None => MonitorConfig::load_default(),
    }
    .context("loading config")?;
    if let Some(dir) = cli.watchlist_dir.clone() {
        cfg.watchlist_dir = Some(dir);
    }
    let tz = cfg.tz()?;

    if let Some(addr) = cfg.metrics_listen {
        Metrics::install(Some(addr)).context("installing metrics exporter")?;
    }

    let dir = cfg.resolve_watchlist_dir()?;
    let window = PollWindow::starting_at(chrono::Utc::now(), cfg.window_open, cfg.window_close, tz)?;

    let user_agent = cfg.user_agent_for(&cli.from);
    let registry = RegistryClient::new(&cfg, &user_agent)?;

    let notifier: Arc<dyn Notifier> = if cli.dry_run {
        Arc::new(LogNotifier)
    } else {
        Arc::new(
            EmailNotifier::new(&cfg.smtp_host, &cli.from, &cli.to, &cli.password)
                .context("configuring email notifier")?,
        )
    };

    // The watch list is read before any registry call; a duplicate file
    // stops the run here.
    let started = MonitorSession::from_watchlist(
        registry,
        notifier,
        &dir,
        &cfg.watchlist_extension,
        window,
        cfg.archive_base_url.clone(),
        cfg.pass_pause(),
    )
    .await;
    let mut session = match started {
        Ok(s) => s,
        Err(e @ MonitorError::DuplicateWatchList(_)) => {
            tracing::warn!(error = %e, "remove all but one watch-list file and rerun");
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e).context("starting session"),
    };

    tokio::select! {
        res = session.run(&SystemClock) => {
            let summary = res.context("polling session failed")?;
            tracing::info!(passes = summary.passes, alerted = summary.alerted, "session finished");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted; shutting down");
        }
    }

    Ok(ExitCode::SUCCESS)
}
