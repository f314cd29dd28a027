//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Without a file, [`Config::default`] reproduces the built-in search.
//!
//! # Example
//!
//! ```no_run
//! use availability_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Starting at: {}", config.site.search_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig, DEFAULT_BASE_URL,
    DEFAULT_OUTPUT_PATH, DEFAULT_SEARCH_PATH,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, hash_config_content, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
