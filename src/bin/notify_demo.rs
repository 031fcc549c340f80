//! Sends one synthetic filing alert, to check SMTP credentials before a real run.
//! Without NOTIFY_EMAIL_TO / NOTIFY_EMAIL_FROM / SMTP_PASS set it only logs.

use chrono::Utc;
use sec_filing_alerts::{
    init_tracing, EmailNotifier, FilingRecord, LogNotifier, MonitorConfig, Notifier,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = MonitorConfig::load_default()?;
    let filing = FilingRecord {
        registrant_name: "Demo Registrant Inc.".into(),
        ticker: "DEMO".into(),
        accession_number: "000000000024000001".into(),
        filing_date: Utc::now().date_naive(),
        form_type: "8-K".into(),
        document_link: format!(
            "{}/0000000000/000000000024000001/demo.htm",
            cfg.archive_base_url
        ),
    };

    let env = |k: &str| std::env::var(k).ok().filter(|v| !v.is_empty());
    match (env("NOTIFY_EMAIL_TO"), env("NOTIFY_EMAIL_FROM"), env("SMTP_PASS")) {
        (Some(to), Some(from), Some(pass)) => {
            let mailer = EmailNotifier::new(&cfg.smtp_host, &from, &to, &pass)?;
            mailer.send(&filing).await?;
            println!("notify-demo: email sent to {to}");
        }
        _ => {
            LogNotifier.send(&filing).await?;
            println!("notify-demo done (email disabled)");
        }
    }
    Ok(())
}
