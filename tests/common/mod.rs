// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use sec_filing_alerts::error::{MonitorError, Result};
use sec_filing_alerts::registry::types::{CompanyDirectory, Submissions};
use sec_filing_alerts::{Clock, FilingRecord, Notifier, PollWindow, Registry, RegistrantId};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const DIRECTORY_JSON: &str = include_str!("../fixtures/company_tickers.json");
pub const AAPL_SUBMISSIONS_JSON: &str = include_str!("../fixtures/submissions_aapl.json");
pub const ARCHIVE: &str = "https://www.sec.gov/Archives/edgar/data";

pub fn fixture_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

pub fn fixture_window() -> PollWindow {
    PollWindow::for_date(
        fixture_day(),
        NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        New_York,
    )
    .unwrap()
}

/// Eastern wall-clock time on the fixture day, as UTC.
pub fn eastern(h: u32, m: u32) -> DateTime<Utc> {
    New_York
        .with_ymd_and_hms(2024, 5, 10, h, m, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// In-memory registry backed by parsed fixtures.
#[derive(Default)]
pub struct FakeRegistry {
    pub directory: Option<CompanyDirectory>,
    pub submissions: HashMap<String, Submissions>,
    pub directory_calls: Mutex<usize>,
    pub submission_calls: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn from_fixtures() -> Self {
        let mut r = Self {
            directory: Some(serde_json::from_str(DIRECTORY_JSON).unwrap()),
            ..Self::default()
        };
        r.submissions.insert(
            "0000320193".into(),
            serde_json::from_str(AAPL_SUBMISSIONS_JSON).unwrap(),
        );
        r
    }

    pub fn total_calls(&self) -> usize {
        *self.directory_calls.lock().unwrap() + self.submission_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn company_directory(&self) -> Result<CompanyDirectory> {
        *self.directory_calls.lock().unwrap() += 1;
        self.directory
            .clone()
            .ok_or_else(|| MonitorError::Registry {
                context: "directory".into(),
                message: "HTTP 503".into(),
            })
    }

    async fn submissions(&self, id: &RegistrantId) -> Result<Submissions> {
        self.submission_calls.lock().unwrap().push(id.to_string());
        match self.submissions.get(id.as_str()) {
            Some(s) => Ok(s.clone()),
            None => Ok(serde_json::from_str(&format!(
                r#"{{"name":"Registrant {id}","tickers":[],"filings":{{"recent":{{
                    "accessionNumber":[],"filingDate":[],"form":[],"primaryDocument":[]}}}}}}"#
            ))
            .unwrap()),
        }
    }
}

/// Records every alert; optionally fails on a given accession number.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<FilingRecord>>,
    pub fail_on: Option<String>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<FilingRecord> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, filing: &FilingRecord) -> anyhow::Result<()> {
        if self.fail_on.as_deref() == Some(filing.accession_number.as_str()) {
            anyhow::bail!("smtp rejected message");
        }
        self.sent.lock().unwrap().push(filing.clone());
        Ok(())
    }
}

/// Returns queued instants in order, then repeats the last one.
pub struct ScriptedClock {
    times: Mutex<VecDeque<DateTime<Utc>>>,
    last: Mutex<DateTime<Utc>>,
}

impl ScriptedClock {
    pub fn new(times: &[DateTime<Utc>]) -> Self {
        let last = *times.last().expect("at least one instant");
        Self {
            times: Mutex::new(times.iter().copied().collect()),
            last: Mutex::new(last),
        }
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.times.lock().unwrap().pop_front() {
            Some(t) => {
                *self.last.lock().unwrap() = t;
                t
            }
            None => *self.last.lock().unwrap(),
        }
    }
}
