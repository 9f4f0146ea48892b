//! Resilient page retrieval.
//!
//! Provider marketing sites sit behind varying degrees of bot detection.
//! The fetcher rotates through a pool of realistic browser user-agents and
//! sends browser-like headers; a 403 is treated as transient bot-friction
//! and retried with exponential backoff, any other failure gets one extra
//! attempt after a short random delay.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::error::ScrapeError;

/// Desktop browser user-agents rotated across requests.
const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
];

const REFERER: &str = "https://www.google.com/";

/// HTTP client for provider plan pages.
///
/// `forbidden_retries` bounds the total attempts made against a 403
/// response; other failures are retried exactly once with a 1–3 s random
/// delay before giving up.
pub struct PageFetcher {
    client: reqwest::Client,
    forbidden_retries: u32,
    backoff_base_ms: u64,
    ua_cursor: AtomicUsize,
}

impl PageFetcher {
    /// Creates a fetcher with the given request timeout and 403 retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        forbidden_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|source| ScrapeError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self {
            client,
            forbidden_retries: forbidden_retries.max(1),
            backoff_base_ms,
            ua_cursor: AtomicUsize::new(0),
        })
    }

    /// Fetches the HTML body of a provider page.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::HttpStatus`] for a non-2xx response after
    /// retries are exhausted, or [`ScrapeError::Http`] for network-level
    /// failures.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let mut forbidden_attempts = 0u32;
        let mut other_retried = false;

        loop {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(err) if err.status() == Some(403) => {
                    // 403 usually means transient bot detection, not a
                    // permanently blocked page.
                    forbidden_attempts += 1;
                    if forbidden_attempts >= self.forbidden_retries {
                        return Err(err);
                    }
                    let delay_ms = self
                        .backoff_base_ms
                        .saturating_mul(1u64 << (forbidden_attempts - 1).min(10));
                    tracing::warn!(
                        url,
                        attempt = forbidden_attempts,
                        delay_ms,
                        "got 403, backing off before retry"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(err) => {
                    if other_retried {
                        return Err(err);
                    }
                    other_retried = true;
                    let delay_ms = 1000 + rand::random::<u64>() % 2000;
                    tracing::debug!(url, delay_ms, error = %err, "fetch failed, retrying once");
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<String, ScrapeError> {
        let user_agent = self.next_user_agent();
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .headers(browser_headers())
            .send()
            .await
            .map_err(|source| ScrapeError::Http {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response.text().await.map_err(|source| ScrapeError::Http {
            url: url.to_owned(),
            source,
        })
    }

    fn next_user_agent(&self) -> &'static str {
        let index = self.ua_cursor.fetch_add(1, Ordering::Relaxed);
        USER_AGENTS[index % USER_AGENTS.len()]
    }
}

/// The consistent header set sent with every request.
///
/// Accept-Encoding is negotiated by reqwest itself (gzip/br/deflate
/// features), so it is deliberately absent here.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-AU,en;q=0.9"),
    );
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("cross-site"));
    headers.insert(
        reqwest::header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert(reqwest::header::REFERER, HeaderValue::from_static(REFERER));
    headers
}
