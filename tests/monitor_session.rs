// tests/monitor_session.rs
mod common;

use common::*;
use sec_filing_alerts::{MonitorError, MonitorSession, RegistrantId};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

fn tickers(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

async fn session(
    registry: Arc<FakeRegistry>,
    notifier: Arc<RecordingNotifier>,
    watch: &[&str],
) -> MonitorSession<Arc<FakeRegistry>, Arc<RecordingNotifier>> {
    MonitorSession::start(
        registry,
        notifier,
        &tickers(watch),
        fixture_window(),
        ARCHIVE,
        Duration::ZERO,
    )
    .await
    .expect("start session")
}

#[tokio::test]
async fn resolves_once_and_drops_unknown_tickers() {
    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier::default());
    let s = session(registry.clone(), notifier, &["AAPL", "MSFT", "ZZZZZZ"]).await;

    let ids: Vec<_> = s.registrants().iter().map(RegistrantId::as_str).collect();
    assert_eq!(ids, vec!["0000320193", "0000789019"]);
    assert_eq!(*registry.directory_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn three_today_two_earlier_gives_three_aligned_alerts() {
    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut s = session(registry, notifier.clone(), &["AAPL"]).await;

    let pass = s.run_pass().await.unwrap();
    assert_eq!(pass.todays_filings, 3);
    assert_eq!(pass.alerted, 3);

    let sent = notifier.sent();
    let got: Vec<_> = sent
        .iter()
        .map(|f| (f.form_type.as_str(), f.document_link.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            (
                "8-K",
                "https://www.sec.gov/Archives/edgar/data/0000320193/000119312524000123/ex99.htm"
            ),
            (
                "4",
                "https://www.sec.gov/Archives/edgar/data/0000320193/000032019324000081/xslF345X05/wf-form4.xml"
            ),
            (
                "SC 13G/A",
                "https://www.sec.gov/Archives/edgar/data/0000320193/000114036124027010/sc13ga.htm"
            ),
        ]
    );
    assert!(sent
        .iter()
        .all(|f| f.filing_date == fixture_day() && f.registrant_name == "Apple Inc." && f.ticker == "AAPL"));
}

#[tokio::test]
async fn repeated_accession_alerts_once_per_run() {
    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut s = session(registry.clone(), notifier.clone(), &["AAPL"]).await;

    let clock = ScriptedClock::new(&[eastern(9, 0), eastern(9, 5), eastern(22, 1)]);
    let run = s.run(&clock).await.unwrap();

    assert_eq!(run.passes, 2);
    assert_eq!(run.alerted, 3);
    assert_eq!(notifier.sent().len(), 3);
    assert_eq!(s.dedup().len(), 3);
    // Both passes still fetched the registrant.
    assert_eq!(registry.submission_calls.lock().unwrap().len(), 2);

    let second = s.run_pass().await.unwrap();
    assert_eq!(second.alerted, 0);
    assert_eq!(second.duplicates, 3);
}

#[tokio::test]
async fn closed_window_runs_no_passes() {
    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut s = session(
        registry.clone(),
        notifier.clone(),
        &["AAPL", "MSFT", "NVDA", "BRK-B"],
    )
    .await;
    let calls_after_start = registry.total_calls();

    for t in [eastern(5, 59), eastern(22, 0) + chrono::Duration::seconds(1)] {
        let run = s.run(&ScriptedClock::new(&[t])).await.unwrap();
        assert_eq!(run.passes, 0);
    }
    assert_eq!(registry.total_calls(), calls_after_start);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn notifier_failure_stops_the_pass() {
    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier {
        fail_on: Some("000032019324000081".into()),
        ..RecordingNotifier::default()
    });
    let mut s = session(registry, notifier.clone(), &["AAPL"]).await;

    let err = s.run_pass().await.unwrap_err();
    assert!(matches!(err, MonitorError::Notify { ref accession, .. } if accession == "000032019324000081"));
    // The first filing went out and was recorded; the failing one was not.
    assert_eq!(notifier.sent().len(), 1);
    assert!(s.dedup().contains("000119312524000123"));
    assert!(!s.dedup().contains("000032019324000081"));
}

#[tokio::test]
async fn directory_failure_aborts_start() {
    let registry = Arc::new(FakeRegistry::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let res = MonitorSession::start(
        registry,
        notifier.clone(),
        &tickers(&["AAPL"]),
        fixture_window(),
        ARCHIVE,
        Duration::ZERO,
    )
    .await;
    assert!(res.is_err());
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn empty_watch_list_polls_nothing() {
    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut s = session(registry.clone(), notifier.clone(), &[]).await;

    let run = s
        .run(&ScriptedClock::new(&[eastern(10, 0), eastern(23, 0)]))
        .await
        .unwrap();
    assert_eq!(run.passes, 1);
    assert!(registry.submission_calls.lock().unwrap().is_empty());
    assert!(notifier.sent().is_empty());
}

async fn session_from_dir(
    registry: Arc<FakeRegistry>,
    notifier: Arc<RecordingNotifier>,
    dir: &std::path::Path,
) -> sec_filing_alerts::error::Result<MonitorSession<Arc<FakeRegistry>, Arc<RecordingNotifier>>> {
    MonitorSession::from_watchlist(
        registry,
        notifier,
        dir,
        "csv",
        fixture_window(),
        ARCHIVE,
        Duration::ZERO,
    )
    .await
}

#[tokio::test]
async fn two_watch_lists_fail_before_any_registry_request() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.csv"), "AAPL\n").unwrap();
    std::fs::write(dir.path().join("b.csv"), "MSFT\n").unwrap();

    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier::default());
    let err = session_from_dir(registry.clone(), notifier.clone(), dir.path())
        .await
        .err()
        .expect("duplicate watch lists must fail");

    assert!(matches!(err, MonitorError::DuplicateWatchList(ref p) if p.len() == 2));
    assert_eq!(registry.total_calls(), 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn watch_list_file_drives_resolution() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tickers.csv"), "\u{feff}AAPL\n").unwrap();

    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier::default());
    let s = session_from_dir(registry.clone(), notifier, dir.path())
        .await
        .unwrap();

    let ids: Vec<_> = s.registrants().iter().map(RegistrantId::as_str).collect();
    assert_eq!(ids, vec!["0000320193"]);
    assert_eq!(*registry.directory_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn missing_watch_list_monitors_nothing() {
    let dir = tempfile::tempdir().unwrap();

    let registry = Arc::new(FakeRegistry::from_fixtures());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut s = session_from_dir(registry.clone(), notifier.clone(), dir.path())
        .await
        .unwrap();

    assert!(s.registrants().is_empty());
    let pass = s.run_pass().await.unwrap();
    assert_eq!(pass.alerted, 0);
    assert!(registry.submission_calls.lock().unwrap().is_empty());
}
