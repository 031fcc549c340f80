// src/notify/mod.rs
pub mod email;
pub mod log;

use anyhow::Result;

use crate::types::FilingRecord;

pub use email::EmailNotifier;
pub use log::LogNotifier;

/// Delivers one alert per newly detected filing. An `Err` stops the session.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, filing: &FilingRecord) -> Result<()>;
}

#[async_trait::async_trait]
impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    async fn send(&self, filing: &FilingRecord) -> Result<()> {
        (**self).send(filing).await
    }
}

pub fn alert_subject(filing: &FilingRecord) -> String {
    format!("{} | New SEC filing", filing.ticker)
}

pub fn alert_body(filing: &FilingRecord) -> String {
    format!(
        "Name: {}\nTicker: {}\nFiling Date: {}\nForm: {}\nLink: {}\n",
        filing.registrant_name,
        filing.ticker,
        filing.filing_date.format("%Y-%m-%d"),
        filing.form_type,
        filing.document_link
    )
}
