//! Crawler module for results page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with status and Content-Type validation
//! - HTML parsing, listing selection and "Next" link discovery
//! - The pagination loop that accumulates availability dates

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{CrawlSummary, Crawler};
pub use fetcher::{
    build_http_client, fetch_page, fetch_url, is_html_content_type, user_agent_string,
    FetchResult,
};
pub use parser::{Document, Link, AVAILABILITY_SELECTOR, NEXT_LINK_TEXT};
