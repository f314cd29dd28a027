//! Crawler coordinator - pagination loop
//!
//! This module contains the main crawl loop, which:
//! - Fetches one results page at a time
//! - Extracts and parses the availability date of every listing
//! - Follows the "Next" link until the chain ends, a page cannot be
//!   loaded, the page limit is hit or a page repeats

use crate::availability::{availability_from_text, Clock, SystemClock};
use crate::config::{validate, Config};
use crate::crawler::parser::Document;
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::state::CrawlState;
use crate::CrawlError;
use chrono::NaiveDate;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Outcome of one `Crawler::crawl` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages fetched successfully
    pub pages_visited: u32,
    /// Dates appended during this crawl
    pub dates_collected: usize,
    /// Terminal state the loop stopped in
    pub final_state: CrawlState,
}

/// Dates and next link read from one page
struct PageExtract {
    dates: Vec<NaiveDate>,
    next_path: Option<String>,
}

/// Walks a pagination chain and accumulates availability dates
///
/// The accumulated dates are owned by this value. Repeated `crawl` calls
/// keep appending to the same sequence.
pub struct Crawler {
    client: Client,
    base_url: Url,
    max_pages: Option<u32>,
    clock: Box<dyn Clock>,
    availabilities: Vec<NaiveDate>,
    state: CrawlState,
}

impl Crawler {
    /// Creates a crawler for the configured site
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(CrawlError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        validate(config)?;

        let base_url = Url::parse(&config.site.base_url)?;
        let client = build_http_client(&config.user_agent, &config.crawler)?;

        Ok(Self {
            client,
            base_url,
            max_pages: config.crawler.max_pages,
            clock: Box::new(SystemClock),
            availabilities: Vec::new(),
            state: CrawlState::Ready,
        })
    }

    /// Replaces the clock used for the "immediately" sentinel
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Dates collected so far, in page traversal order
    pub fn availabilities(&self) -> &[NaiveDate] {
        &self.availabilities
    }

    /// Consumes the crawler and returns the collected dates
    pub fn into_availabilities(self) -> Vec<NaiveDate> {
        self.availabilities
    }

    /// State the last crawl stopped in
    ///
    /// `CrawlState::Failed` after a crawl that returned an error.
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Resolves a page reference against the site root
    ///
    /// A reference starting with `/` is appended to the base URL, path
    /// prefix included: base `https://host/uk` and `/to-rent/?pn=2` give
    /// `https://host/uk/to-rent/?pn=2`. Absolute URLs are used as they are;
    /// anything else is resolved relative to the base URL.
    pub fn page_url(&self, reference: &str) -> Result<Url, CrawlError> {
        if let Ok(absolute) = Url::parse(reference) {
            return Ok(absolute);
        }

        if reference.starts_with('/') {
            let prefix = self.base_url.path().trim_end_matches('/');
            return Ok(self.base_url.join(&format!("{}{}", prefix, reference))?);
        }

        Ok(self.base_url.join(reference)?)
    }

    /// Follows the pagination chain starting at `start_path`
    ///
    /// A page that cannot be loaded (bad reference, network fault, bad
    /// status or content type) ends the crawl with `CrawlState::Aborted`;
    /// dates gathered before it are kept. A listing whose date cannot be
    /// read fails the whole crawl with `CrawlState::Failed`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use availability_crawler::{Config, Crawler};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::default();
    /// let mut crawler = Crawler::new(&config)?;
    /// let summary = crawler.crawl(&config.site.search_path).await?;
    /// println!("{} dates over {} pages", summary.dates_collected, summary.pages_visited);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(&mut self, start_path: &str) -> Result<CrawlSummary, CrawlError> {
        self.state = CrawlState::Ready;

        let mut path = start_path.to_string();
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages_visited: u32 = 0;
        let dates_before = self.availabilities.len();

        loop {
            // Ready
            if let Some(max) = self.max_pages.filter(|max| pages_visited >= *max) {
                tracing::warn!("Page limit of {} reached, not loading '{}'", max, path);
                self.transition(CrawlState::LimitReached)?;
                break;
            }

            tracing::info!("Loading: '{}'", path);
            let url = match self.page_url(&path) {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!("Error during request to '{}' : {}", path, e);
                    self.transition(CrawlState::Aborted)?;
                    break;
                }
            };
            visited.insert(url.to_string());

            let fetched = fetch_url(&self.client, url.as_str()).await;
            let body = match fetched {
                FetchResult::Success {
                    final_url,
                    content_type,
                    body,
                } => {
                    tracing::debug!(
                        "Fetched {} ({}, {} bytes)",
                        final_url,
                        content_type,
                        body.len()
                    );
                    body
                }
                _ => {
                    self.transition(CrawlState::Aborted)?;
                    break;
                }
            };
            pages_visited += 1;
            self.transition(CrawlState::Fetched)?;

            let page = match self.extract_page(&body) {
                Ok(page) => page,
                Err(e) => {
                    self.transition(CrawlState::Failed)?;
                    return Err(e);
                }
            };
            tracing::debug!("{} availabilities on '{}'", page.dates.len(), path);
            self.availabilities.extend(page.dates);
            self.transition(CrawlState::Extracted)?;

            match page.next_path {
                Some(next_path) => {
                    let repeats = self
                        .page_url(&next_path)
                        .map(|next_url| visited.contains(next_url.as_str()))
                        .unwrap_or(false);
                    if repeats {
                        tracing::warn!("'{}' was already loaded, stopping", next_path);
                        self.transition(CrawlState::CycleDetected)?;
                        break;
                    }

                    tracing::info!("Going one level deeper...");
                    self.transition(CrawlState::Ready)?;
                    path = next_path;
                }
                None => {
                    tracing::info!("Done");
                    self.transition(CrawlState::Done)?;
                    break;
                }
            }
        }

        Ok(CrawlSummary {
            pages_visited,
            dates_collected: self.availabilities.len() - dates_before,
            final_state: self.state,
        })
    }

    /// Parses one page body; the document never outlives this call
    fn extract_page(&self, body: &[u8]) -> Result<PageExtract, CrawlError> {
        let document = Document::parse(body);

        let dates = document
            .availability_texts()
            .iter()
            .map(|text| availability_from_text(text, self.clock.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageExtract {
            dates,
            next_path: document.next_page_path(),
        })
    }

    fn transition(&mut self, to: CrawlState) -> Result<(), CrawlError> {
        if !self.state.can_transition_to(to) {
            return Err(CrawlError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        tracing::trace!("Crawl state {} -> {}", self.state, to);
        if to.is_terminal() {
            tracing::debug!("Crawl finished in state {}", to);
        }
        self.state = to;
        Ok(())
    }
}
