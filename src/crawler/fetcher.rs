//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests for results pages
//! - Status and Content-Type validation
//! - Error classification

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Status 200 with an HTML Content-Type
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Content-Type header value
        content_type: String,
        /// Full page body
        body: Vec<u8>,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Missing or non-HTML Content-Type
    ContentMismatch {
        /// The Content-Type received (empty when the header was absent)
        content_type: String,
    },

    /// Network error (connection refused, timeout, DNS, reset body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Collapses the result to the page body, or `None` for any failure
    pub fn into_body(self) -> Option<Vec<u8>> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Formats the user agent string: `Name/Version` or `Name/Version (+contact)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Timeouts for every request
///
/// # Example
///
/// ```no_run
/// use availability_crawler::config::{CrawlerConfig, UserAgentConfig};
/// use availability_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if the Content-Type names an HTML (or XHTML) document
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("html")
}

/// Fetches a URL and classifies the response
///
/// | Condition | Result | Logged |
/// |-----------|--------|--------|
/// | 200 + HTML Content-Type | Success | no |
/// | Any other status | HttpError | no |
/// | Missing or non-HTML Content-Type | ContentMismatch | no |
/// | Connect/timeout/DNS/body read failure | NetworkError | yes |
///
/// There is no retry; one request per call.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return network_error(url, e),
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!("Ignoring {} (HTTP {})", url, status.as_u16());
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        tracing::debug!("Ignoring {} (Content-Type {:?})", url, content_type);
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().to_string();
    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            final_url,
            content_type,
            body: body.to_vec(),
        },
        Err(e) => network_error(url, e),
    }
}

/// Fetches a URL and returns the body only for a usable HTML page
pub async fn fetch_page(client: &Client, url: &str) -> Option<Vec<u8>> {
    fetch_url(client, url).await.into_body()
}

fn network_error(url: &str, e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        format!("Request timeout: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };

    tracing::error!("Error during request to {} : {}", url, error);
    FetchResult::NetworkError { error }
}
