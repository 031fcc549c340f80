// src/notify/log.rs
use anyhow::Result;

use super::{alert_subject, Notifier};
use crate::types::FilingRecord;

/// Dry-run notifier: writes the alert to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, filing: &FilingRecord) -> Result<()> {
        tracing::info!(
            target: "alert",
            subject = %alert_subject(filing),
            name = %filing.registrant_name,
            form = %filing.form_type,
            date = %filing.filing_date,
            link = %filing.document_link,
            "filing alert (dry run)"
        );
        Ok(())
    }
}
