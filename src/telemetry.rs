// src/telemetry.rs
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::net::SocketAddr;

use crate::error::{MonitorError, Result};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. With `listen`, the exporter
    /// also serves the scrape endpoint there; must then run inside a tokio
    /// runtime.
    pub fn install(listen: Option<SocketAddr>) -> Result<Self> {
        let builder = PrometheusBuilder::new();

        let handle = match listen {
            Some(addr) => {
                let (recorder, exporter) = builder
                    .with_http_listener(addr)
                    .build()
                    .map_err(|e| MonitorError::Config(format!("prometheus exporter: {e}")))?;
                let handle = recorder.handle();
                metrics::set_global_recorder(recorder).map_err(|_| {
                    MonitorError::Config("a metrics recorder is already installed".into())
                })?;
                tokio::spawn(async move {
                    // ExporterError (metrics-exporter-prometheus 0.15) implements
                    // neither Debug nor Display, so it cannot be logged.
                    if exporter.await.is_err() {
                        tracing::warn!("prometheus exporter stopped");
                    }
                });
                tracing::info!(%addr, "prometheus exporter listening");
                handle
            }
            None => builder
                .install_recorder()
                .map_err(|e| MonitorError::Config(format!("prometheus recorder: {e}")))?,
        };

        describe_metrics();
        Ok(Self { handle })
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// One-time metrics registration (so series carry help text).
pub(crate) fn describe_metrics() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("registry_requests_total", "Requests sent to the registry.");
        describe_counter!(
            "registry_retries_total",
            "Registry requests retried after a transient failure."
        );
        describe_counter!("filings_alerted_total", "Filings handed to the notifier.");
        describe_counter!(
            "filings_duplicate_total",
            "Same-day filings skipped because they were already alerted."
        );
        describe_counter!("poll_passes_total", "Completed passes over all registrants.");
        describe_gauge!("registrants_watched", "Registrants resolved from the watch list.");
    });
}
