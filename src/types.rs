// src/types.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::error::{MonitorError, Result};

/// Registry filer identifier: exactly 10 ASCII digits, zero-left-padded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RegistrantId(String);

impl RegistrantId {
    pub const WIDTH: usize = 10;

    pub fn from_cik(cik: u64) -> Result<Self> {
        Self::parse(&cik.to_string())
    }

    /// Accepts 1..=10 digits and left-pads with zeros.
    pub fn parse(raw: &str) -> Result<Self> {
        let s = raw.trim();
        if s.is_empty() || s.len() > Self::WIDTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MonitorError::InvalidRegistrantId(raw.to_string()));
        }
        Ok(Self(format!("{:0>width$}", s, width = Self::WIDTH)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One detected same-day filing, ready to hand to a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingRecord {
    pub registrant_name: String,
    pub ticker: String,
    /// Dash-stripped accession number; the dedup key.
    pub accession_number: String,
    pub filing_date: NaiveDate,
    pub form_type: String,
    pub document_link: String,
}
