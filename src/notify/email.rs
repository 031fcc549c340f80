// src/notify/email.rs
use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{alert_body, alert_subject, Notifier};
use crate::types::FilingRecord;

pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    /// SMTP relay on `host`, authenticating as the sender address.
    pub fn new(host: &str, from_addr: &str, to_addr: &str, password: &str) -> Result<Self> {
        let (from, to) = parse_addresses(from_addr, to_addr)?;

        let creds = Credentials::new(from_addr.to_string(), password.to_string());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .with_context(|| format!("invalid SMTP host {host}"))?
            .credentials(creds)
            .build();

        Ok(Self { mailer, from, to })
    }
}

fn parse_addresses(from_addr: &str, to_addr: &str) -> Result<(Mailbox, Mailbox)> {
    let from: Mailbox = from_addr
        .parse()
        .with_context(|| format!("invalid sender address {from_addr}"))?;
    let to: Mailbox = to_addr
        .parse()
        .with_context(|| format!("invalid recipient address {to_addr}"))?;
    Ok((from, to))
}

pub fn build_message(from: &Mailbox, to: &Mailbox, filing: &FilingRecord) -> Result<Message> {
    Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(alert_subject(filing))
        .header(header::ContentType::TEXT_PLAIN)
        .body(alert_body(filing))
        .context("build email")
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, filing: &FilingRecord) -> Result<()> {
        let msg = build_message(&self.from, &self.to, filing)?;
        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
