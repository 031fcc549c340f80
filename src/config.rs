// src/config.rs
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{MonitorError, Result};

pub const ENV_CONFIG_PATH: &str = "FILING_MONITOR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";
/// Upper bound on attempts per registry request.
pub const MAX_RETRIES_LIMIT: u8 = 10;

fn default_directory_url() -> String {
    "https://www.sec.gov/files/company_tickers.json".to_string()
}
fn default_submissions_base_url() -> String {
    "https://data.sec.gov/submissions".to_string()
}
fn default_archive_base_url() -> String {
    "https://www.sec.gov/Archives/edgar/data".to_string()
}
fn default_max_requests_per_sec() -> u32 {
    10
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u8 {
    3
}
fn default_retry_base_ms() -> u64 {
    500
}
fn default_timezone() -> String {
    "America/New_York".to_string()
}
fn default_window_open() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default()
}
fn default_window_close() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default()
}
fn default_pass_pause_ms() -> u64 {
    1_000
}
fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_watchlist_extension() -> String {
    "csv".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    #[serde(default = "default_directory_url")]
    pub directory_url: String,
    #[serde(default = "default_submissions_base_url")]
    pub submissions_base_url: String,
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,
    /// Identification header sent to the registry. Defaults to the tool name
    /// plus the sender address.
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default = "default_max_requests_per_sec")]
    pub max_requests_per_sec: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Total attempts per registry request, first try included.
    #[serde(default = "default_max_retries")]
    pub max_retries: u8,
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
    /// IANA name, e.g. "America/New_York".
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_window_open")]
    pub window_open: NaiveTime,
    #[serde(default = "default_window_close")]
    pub window_close: NaiveTime,
    #[serde(default = "default_pass_pause_ms")]
    pub pass_pause_ms: u64,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default)]
    pub watchlist_dir: Option<PathBuf>,
    #[serde(default = "default_watchlist_extension")]
    pub watchlist_extension: String,
    /// Serve Prometheus metrics on this address when set.
    #[serde(default)]
    pub metrics_listen: Option<SocketAddr>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            submissions_base_url: default_submissions_base_url(),
            archive_base_url: default_archive_base_url(),
            user_agent: None,
            max_requests_per_sec: default_max_requests_per_sec(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
            timezone: default_timezone(),
            window_open: default_window_open(),
            window_close: default_window_close(),
            pass_pause_ms: default_pass_pause_ms(),
            smtp_host: default_smtp_host(),
            watchlist_dir: None,
            watchlist_extension: default_watchlist_extension(),
            metrics_listen: None,
        }
    }
}

impl MonitorConfig {
    /// Load and validate a TOML config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("reading config from {}: {e}", path.display()))
        })?;
        let cfg: MonitorConfig = toml::from_str(&content).map_err(|e| {
            MonitorError::Config(format!("parsing config {}: {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config using env var + fallbacks:
    /// 1) $FILING_MONITOR_CONFIG
    /// 2) config/monitor.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(MonitorError::Config(format!(
                "{ENV_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            )));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_requests_per_sec == 0 {
            return Err(MonitorError::Config(
                "max_requests_per_sec must be greater than zero".into(),
            ));
        }
        if !(1..=MAX_RETRIES_LIMIT).contains(&self.max_retries) {
            return Err(MonitorError::Config(format!(
                "max_retries must be between 1 and {MAX_RETRIES_LIMIT}, got {}",
                self.max_retries
            )));
        }
        if self.window_open >= self.window_close {
            return Err(MonitorError::Config(format!(
                "window_open ({}) must be before window_close ({})",
                self.window_open, self.window_close
            )));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| MonitorError::Timezone(self.timezone.clone()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pass_pause(&self) -> Duration {
        Duration::from_millis(self.pass_pause_ms)
    }

    pub fn user_agent_for(&self, sender: &str) -> String {
        match &self.user_agent {
            Some(ua) if !ua.trim().is_empty() => ua.trim().to_string(),
            _ => format!(
                "{}/{} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                sender
            ),
        }
    }

    /// Watch-list directory, defaulting to the directory holding the executable.
    pub fn resolve_watchlist_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.watchlist_dir {
            return Ok(dir.clone());
        }
        let exe = std::env::current_exe()?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| MonitorError::Config("executable has no parent directory".into()))
    }
}
