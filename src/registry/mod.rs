// src/registry/mod.rs
pub mod types;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::rate_limit::RateLimiter;
use crate::types::RegistrantId;
use types::{CompanyDirectory, Submissions};

/// The two registry endpoints the monitor reads.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn company_directory(&self) -> Result<CompanyDirectory>;
    async fn submissions(&self, id: &RegistrantId) -> Result<Submissions>;
}

#[async_trait]
impl<R: Registry + ?Sized> Registry for Arc<R> {
    async fn company_directory(&self) -> Result<CompanyDirectory> {
        (**self).company_directory().await
    }

    async fn submissions(&self, id: &RegistrantId) -> Result<Submissions> {
        (**self).submissions(id).await
    }
}

/// HTTP client for the registry: identification header on every request,
/// shared pacing, bounded retry for transient failures.
pub struct RegistryClient {
    client: Client,
    limiter: Arc<RateLimiter>,
    directory_url: String,
    submissions_base_url: String,
    max_retries: u8,
    retry_base: Duration,
}

impl RegistryClient {
    pub fn new(cfg: &MonitorConfig, user_agent: &str) -> Result<Self> {
        let ua = header::HeaderValue::from_str(user_agent)
            .map_err(|e| MonitorError::Config(format!("invalid user agent {user_agent:?}: {e}")))?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, ua);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| MonitorError::Config(format!("building http client: {e}")))?;

        Ok(Self {
            client,
            limiter: Arc::new(RateLimiter::per_second(cfg.max_requests_per_sec)),
            directory_url: cfg.directory_url.clone(),
            submissions_base_url: cfg.submissions_base_url.trim_end_matches('/').to_string(),
            max_retries: cfg.max_retries.max(1),
            retry_base: Duration::from_millis(cfg.retry_base_ms),
        })
    }

    pub fn submissions_url(&self, id: &RegistrantId) -> String {
        format!("{}/CIK{}.json", self.submissions_base_url, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            match self.get_json_once(url).await {
                Ok(v) => return Ok(v),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let backoff = backoff_delay(self.retry_base, attempt);
                    tracing::warn!(
                        %url,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "registry request failed, retrying"
                    );
                    counter!("registry_retries_total").increment(1);
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.limiter.acquire().await;
        counter!("registry_requests_total").increment(1);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let msg = format!("HTTP {status}");
            return Err(if is_retryable_status(status) {
                MonitorError::transient(url, msg)
            } else {
                MonitorError::registry(url, msg)
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| classify_send_error(url, e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| MonitorError::registry(url, format!("decoding body: {e}")))
    }
}

/// Longest single wait between attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// `base * 2^(attempt-1)`, saturating, capped at [`MAX_BACKOFF`].
fn backoff_delay(base: Duration, attempt: u8) -> Duration {
    let factor = 1u32
        .checked_shl(u32::from(attempt.saturating_sub(1)))
        .unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn classify_send_error(url: &str, e: reqwest::Error) -> MonitorError {
    if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() {
        MonitorError::transient(url, e)
    } else {
        MonitorError::registry(url, e)
    }
}

#[async_trait]
impl Registry for RegistryClient {
    async fn company_directory(&self) -> Result<CompanyDirectory> {
        self.get_json(&self.directory_url).await
    }

    async fn submissions(&self, id: &RegistrantId) -> Result<Submissions> {
        self.get_json(&self.submissions_url(id)).await
    }
}
