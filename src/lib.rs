// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod dedup;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod poller;
pub mod rate_limit;
pub mod registry;
pub mod resolver;
pub mod telemetry;
pub mod types;
pub mod watchlist;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::config::MonitorConfig;
pub use crate::error::MonitorError;
pub use crate::monitor::{Clock, MonitorSession, PassSummary, RunSummary, SystemClock};
pub use crate::notify::{EmailNotifier, LogNotifier, Notifier};
pub use crate::registry::{Registry, RegistryClient};
pub use crate::telemetry::Metrics;
pub use crate::types::{FilingRecord, RegistrantId};
pub use crate::window::PollWindow;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber. `LOG_FORMAT=json` selects JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sec_filing_alerts=info,alert=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let subscriber = tracing_subscriber::registry().with(filter);
    if json {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber.with(fmt::layer().compact()).init();
    }
}
