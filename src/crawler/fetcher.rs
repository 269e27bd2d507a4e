//! HTTP fetching and failure classification
//!
//! Every fetch resolves to a terminal [`FetchOutcome`] within the configured
//! deadline; there is no retry. Failures are classified into the status code
//! recorded on the target: timeout → 408, non-2xx response → the literal
//! code, anything else → 500.

use reqwest::Client;
use std::time::Duration;

/// Per-fetch deadline covering connect, redirects, and body download.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Status recorded when a fetch exceeds its deadline.
pub const TIMEOUT_STATUS: u16 = 408;

/// Status recorded for transport-level failures (DNS, connection reset,
/// malformed response).
pub const DEFAULT_FAILURE_STATUS: u16 = 500;

/// Terminal result of fetching one target
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered with a 2xx response
    Success {
        /// Final URL after any redirects
        final_url: String,
        /// HTTP status of the final response
        status_code: u16,
        /// Response body; empty for probe-only fetches
        body: String,
    },

    /// The fetch failed; the crawl records the classified status and moves on
    Failed {
        /// Classified status code
        status_code: u16,
    },
}

/// Builds the HTTP client used for the whole crawl.
///
/// Redirects are followed (library default cap) so the final response URL
/// can be compared against the requested URL for redirect detection.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("linkscout/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page, reading the body for link extraction.
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    fetch(client, url, true).await
}

/// Fetches a URL for its status only, discarding the body.
///
/// Used for external and document targets, which are tested but never
/// parsed.
pub async fn probe_url(client: &Client, url: &str) -> FetchOutcome {
    fetch(client, url, false).await
}

async fn fetch(client: &Client, url: &str, read_body: bool) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(error) => return classify_error(&error),
    };

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();

    if !response.status().is_success() {
        return FetchOutcome::Failed { status_code };
    }

    if !read_body {
        return FetchOutcome::Success {
            final_url,
            status_code,
            body: String::new(),
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            final_url,
            status_code,
            body,
        },
        Err(error) => classify_error(&error),
    }
}

fn classify_error(error: &reqwest::Error) -> FetchOutcome {
    let status_code = if error.is_timeout() {
        TIMEOUT_STATUS
    } else if let Some(status) = error.status() {
        status.as_u16()
    } else {
        DEFAULT_FAILURE_STATUS
    };

    tracing::debug!("Fetch failed ({}): {}", status_code, error);
    FetchOutcome::Failed { status_code }
}
