//! State module for tracking crawl progress
//!
//! `CrawlState` models the pagination loop: each results page is fetched,
//! parsed and mined for dates before the crawl moves on or stops.

mod crawl_state;

pub use crawl_state::CrawlState;
