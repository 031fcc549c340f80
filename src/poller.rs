// src/poller.rs
//! Per-registrant detection of filings dated today.

use chrono::NaiveDate;

use crate::error::Result;
use crate::registry::types::Submissions;
use crate::registry::Registry;
use crate::types::{FilingRecord, RegistrantId};

/// `{archive_base}/{registrant_id}/{accession_no_dashes}/{primary_document}`
pub fn document_link(
    archive_base: &str,
    id: &RegistrantId,
    accession_number: &str,
    primary_document: &str,
) -> String {
    format!(
        "{}/{}/{}/{}",
        archive_base.trim_end_matches('/'),
        id,
        accession_number,
        primary_document
    )
}

pub fn strip_dashes(accession: &str) -> String {
    accession.chars().filter(|c| *c != '-').collect()
}

/// Build records for every filing dated `day`. Rows are taken whole from the
/// aligned columns, so form/date/document always come from the same filing.
pub fn todays_filings(
    id: &RegistrantId,
    submissions: &Submissions,
    day: NaiveDate,
    archive_base: &str,
) -> Result<Vec<FilingRecord>> {
    let rows = submissions.filings.recent.entries()?;
    if !rows.iter().any(|r| r.filing_date == day) {
        return Ok(Vec::new());
    }

    let ticker = submissions
        .tickers
        .first()
        .cloned()
        .unwrap_or_else(|| id.to_string());

    Ok(rows
        .into_iter()
        .filter(|r| r.filing_date == day)
        .map(|r| {
            let accession_number = strip_dashes(&r.accession_number);
            FilingRecord {
                registrant_name: submissions.name.clone(),
                ticker: ticker.clone(),
                document_link: document_link(
                    archive_base,
                    id,
                    &accession_number,
                    &r.primary_document,
                ),
                accession_number,
                filing_date: r.filing_date,
                form_type: r.form,
            }
        })
        .collect())
}

/// Fetch one registrant's submissions and extract today's filings.
pub async fn poll_registrant<R: Registry + ?Sized>(
    registry: &R,
    id: &RegistrantId,
    day: NaiveDate,
    archive_base: &str,
) -> Result<Vec<FilingRecord>> {
    let submissions = registry.submissions(id).await?;
    todays_filings(id, &submissions, day, archive_base)
}
