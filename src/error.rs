// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the monitoring core.
///
/// Only [`MonitorError::Transient`] is eligible for retry; everything else
/// stops the session.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("more than one watch-list file found: {}", display_paths(.0))]
    DuplicateWatchList(Vec<PathBuf>),

    #[error("unknown timezone: {0}")]
    Timezone(String),

    #[error("invalid registrant id: {0:?}")]
    InvalidRegistrantId(String),

    #[error("transient registry failure ({context}): {message}")]
    Transient { context: String, message: String },

    #[error("registry error ({context}): {message}")]
    Registry { context: String, message: String },

    #[error("notification failed for {accession}: {message}")]
    Notify { accession: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    pub fn is_transient(&self) -> bool {
        matches!(self, MonitorError::Transient { .. })
    }

    /// True for errors caused by local setup rather than the network.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            MonitorError::Config(_) | MonitorError::DuplicateWatchList(_) | MonitorError::Timezone(_)
        )
    }

    pub(crate) fn transient(context: impl Into<String>, message: impl ToString) -> Self {
        MonitorError::Transient {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn registry(context: impl Into<String>, message: impl ToString) -> Self {
        MonitorError::Registry {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
