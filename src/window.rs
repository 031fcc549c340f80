// src/window.rs
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{MonitorError, Result};

/// Daily active range, anchored to the date the run started. Never re-anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    date: NaiveDate,
    opens_at: DateTime<Tz>,
    closes_at: DateTime<Tz>,
}

impl PollWindow {
    pub fn for_date(date: NaiveDate, open: NaiveTime, close: NaiveTime, tz: Tz) -> Result<Self> {
        let opens_at = local(tz, date, open)?;
        let closes_at = local(tz, date, close)?;
        if opens_at > closes_at {
            return Err(MonitorError::Config(format!(
                "window opens ({opens_at}) after it closes ({closes_at})"
            )));
        }
        Ok(Self {
            date,
            opens_at,
            closes_at,
        })
    }

    /// Window for the calendar date of `now` in `tz`.
    pub fn starting_at(now: DateTime<Utc>, open: NaiveTime, close: NaiveTime, tz: Tz) -> Result<Self> {
        let date = now.with_timezone(&tz).date_naive();
        Self::for_date(date, open, close, tz)
    }

    /// Inclusive at both ends.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.opens_at <= now && now <= self.closes_at
    }

    /// The run's "today".
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn opens_at(&self) -> DateTime<Tz> {
        self.opens_at
    }

    pub fn closes_at(&self) -> DateTime<Tz> {
        self.closes_at
    }
}

fn local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| {
            MonitorError::Config(format!("{date} {time} does not exist in {}", tz.name()))
        })
}
