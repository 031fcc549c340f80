// src/monitor.rs
//! The daily session: resolve once, then poll every registrant while the
//! window is open, alerting each new filing at most once.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use crate::dedup::DedupStore;
use crate::error::{MonitorError, Result};
use crate::notify::Notifier;
use crate::poller::poll_registrant;
use crate::registry::Registry;
use crate::resolver::resolve_with;
use crate::telemetry::describe_metrics;
use crate::types::RegistrantId;
use crate::watchlist;
use crate::window::PollWindow;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub registrants: usize,
    pub todays_filings: usize,
    pub alerted: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: u64,
    pub alerted: usize,
}

/// Explicit run context: everything the loop touches lives here.
pub struct MonitorSession<R, N> {
    registry: R,
    notifier: N,
    window: PollWindow,
    registrants: BTreeSet<RegistrantId>,
    dedup: DedupStore,
    archive_base_url: String,
    pass_pause: Duration,
}

impl<R: Registry, N: Notifier> MonitorSession<R, N> {
    /// Load the watch list from `dir`, then [`start`](Self::start).
    ///
    /// The watch list is read before the registry is touched, so a
    /// [`MonitorError::DuplicateWatchList`] leaves no request behind.
    pub async fn from_watchlist(
        registry: R,
        notifier: N,
        dir: &Path,
        extension: &str,
        window: PollWindow,
        archive_base_url: impl Into<String>,
        pass_pause: Duration,
    ) -> Result<Self> {
        let (path, tickers) = watchlist::load_from_dir(dir, extension)?;
        match path {
            Some(p) => {
                tracing::info!(path = %p.display(), tickers = tickers.len(), "watch list loaded")
            }
            None => {
                tracing::warn!(dir = %dir.display(), "no watch-list file found; nothing to monitor")
            }
        }
        Self::start(registry, notifier, &tickers, window, archive_base_url, pass_pause).await
    }

    /// Resolve `tickers` with a single directory fetch. A failed fetch aborts.
    pub async fn start(
        registry: R,
        notifier: N,
        tickers: &BTreeSet<String>,
        window: PollWindow,
        archive_base_url: impl Into<String>,
        pass_pause: Duration,
    ) -> Result<Self> {
        describe_metrics();

        let resolution = resolve_with(&registry, tickers).await?;
        if !resolution.unmatched.is_empty() {
            tracing::warn!(
                unmatched = ?resolution.unmatched,
                "tickers not found in registry directory"
            );
        }
        tracing::info!(
            tickers = tickers.len(),
            registrants = resolution.registrants.len(),
            "watch list resolved"
        );
        gauge!("registrants_watched").set(resolution.registrants.len() as f64);

        Ok(Self::with_registrants(
            registry,
            notifier,
            resolution.registrants,
            window,
            archive_base_url,
            pass_pause,
        ))
    }

    /// Build a session over an already-resolved registrant set.
    pub fn with_registrants(
        registry: R,
        notifier: N,
        registrants: BTreeSet<RegistrantId>,
        window: PollWindow,
        archive_base_url: impl Into<String>,
        pass_pause: Duration,
    ) -> Self {
        Self {
            registry,
            notifier,
            window,
            registrants,
            dedup: DedupStore::new(),
            archive_base_url: archive_base_url.into(),
            pass_pause,
        }
    }

    pub fn registrants(&self) -> &BTreeSet<RegistrantId> {
        &self.registrants
    }

    pub fn dedup(&self) -> &DedupStore {
        &self.dedup
    }

    pub fn window(&self) -> &PollWindow {
        &self.window
    }

    /// Visit every registrant once. The first error ends the pass.
    pub async fn run_pass(&mut self) -> Result<PassSummary> {
        let day = self.window.date();
        let mut summary = PassSummary {
            registrants: self.registrants.len(),
            ..PassSummary::default()
        };

        for id in &self.registrants {
            let filings = poll_registrant(&self.registry, id, day, &self.archive_base_url).await?;
            summary.todays_filings += filings.len();

            for filing in filings {
                if self.dedup.contains(&filing.accession_number) {
                    summary.duplicates += 1;
                    counter!("filings_duplicate_total").increment(1);
                    continue;
                }

                self.notifier
                    .send(&filing)
                    .await
                    .map_err(|e| MonitorError::Notify {
                        accession: filing.accession_number.clone(),
                        message: format!("{e:#}"),
                    })?;

                tracing::info!(
                    registrant = %id,
                    ticker = %filing.ticker,
                    form = %filing.form_type,
                    accession = %filing.accession_number,
                    "filing alert sent"
                );
                counter!("filings_alerted_total").increment(1);
                self.dedup.insert(filing.accession_number);
                summary.alerted += 1;
            }
        }

        counter!("poll_passes_total").increment(1);
        Ok(summary)
    }

    /// Poll until the window closes, re-checking it after each full pass.
    pub async fn run<C: Clock + ?Sized>(&mut self, clock: &C) -> Result<RunSummary> {
        tracing::info!(
            opens_at = %self.window.opens_at(),
            closes_at = %self.window.closes_at(),
            registrants = self.registrants.len(),
            "polling session starting"
        );

        let mut run = RunSummary::default();
        while self.window.is_open(clock.now()) {
            let pass = self.run_pass().await?;
            run.passes += 1;
            run.alerted += pass.alerted;
            tracing::debug!(
                pass = run.passes,
                todays = pass.todays_filings,
                alerted = pass.alerted,
                duplicates = pass.duplicates,
                "pass complete"
            );
            if !self.pass_pause.is_zero() {
                tokio::time::sleep(self.pass_pause).await;
            }
        }

        tracing::info!(
            passes = run.passes,
            alerted = run.alerted,
            "polling window closed"
        );
        Ok(run)
    }
}
