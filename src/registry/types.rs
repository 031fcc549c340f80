// src/registry/types.rs
//! Wire types for the registry's directory and submissions payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use crate::error::{MonitorError, Result};

/// `company_tickers.json`: an object keyed by row index.
pub type CompanyDirectory = BTreeMap<String, DirectoryEntry>;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DirectoryEntry {
    #[serde(deserialize_with = "cik_from_number_or_string")]
    pub cik_str: u64,
    pub ticker: String,
    #[serde(default)]
    pub title: String,
}

fn cik_from_number_or_string<'de, D>(de: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u64),
        Str(String),
    }

    match NumOrStr::deserialize(de)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// `submissions/CIK##########.json` (only the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct Submissions {
    pub name: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    pub filings: Filings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Filings {
    pub recent: RecentFilings,
}

/// Column-oriented recent filings, index-aligned across all four arrays.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<NaiveDate>,
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub primary_document: Vec<String>,
}

/// One row of [`RecentFilings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFiling {
    pub accession_number: String,
    pub filing_date: NaiveDate,
    pub form: String,
    pub primary_document: String,
}

impl RecentFilings {
    /// Zip the columns into rows. Columns of unequal length are rejected
    /// rather than truncated.
    pub fn entries(&self) -> Result<Vec<RecentFiling>> {
        let n = self.accession_number.len();
        if self.filing_date.len() != n || self.form.len() != n || self.primary_document.len() != n
        {
            return Err(MonitorError::registry(
                "recent filings",
                format!(
                    "misaligned columns: accessionNumber={} filingDate={} form={} primaryDocument={}",
                    n,
                    self.filing_date.len(),
                    self.form.len(),
                    self.primary_document.len()
                ),
            ));
        }

        Ok(self
            .accession_number
            .iter()
            .zip(&self.filing_date)
            .zip(&self.form)
            .zip(&self.primary_document)
            .map(|(((acc, date), form), doc)| RecentFiling {
                accession_number: acc.clone(),
                filing_date: *date,
                form: form.clone(),
                primary_document: doc.clone(),
            })
            .collect())
    }
}
