// src/resolver.rs
use std::collections::{BTreeSet, HashMap};

use crate::error::Result;
use crate::registry::types::CompanyDirectory;
use crate::registry::Registry;
use crate::types::RegistrantId;

/// Outcome of matching the watch list against the registry directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub registrants: BTreeSet<RegistrantId>,
    /// Watch-list tickers with no exact match in the directory.
    pub unmatched: BTreeSet<String>,
}

/// Map tickers to registrant ids by exact, case-sensitive equality.
/// The first directory row wins if a ticker appears more than once.
pub fn resolve(tickers: &BTreeSet<String>, directory: &CompanyDirectory) -> Result<Resolution> {
    let mut by_ticker: HashMap<&str, u64> = HashMap::with_capacity(directory.len());
    let mut rows: Vec<(&String, _)> = directory.iter().collect();
    rows.sort_by_key(|(k, _)| k.parse::<u64>().unwrap_or(u64::MAX));
    for (_, entry) in rows {
        by_ticker.entry(entry.ticker.as_str()).or_insert(entry.cik_str);
    }

    let mut out = Resolution::default();
    for t in tickers {
        match by_ticker.get(t.as_str()) {
            Some(cik) => {
                out.registrants.insert(RegistrantId::from_cik(*cik)?);
            }
            None => {
                out.unmatched.insert(t.clone());
            }
        }
    }
    Ok(out)
}

/// One-time directory fetch followed by [`resolve`]. Any fetch failure is
/// returned as-is; no partial resolution is attempted.
pub async fn resolve_with<R: Registry + ?Sized>(
    registry: &R,
    tickers: &BTreeSet<String>,
) -> Result<Resolution> {
    let directory = registry.company_directory().await?;
    tracing::debug!(entries = directory.len(), "registry directory fetched");
    resolve(tickers, &directory)
}
