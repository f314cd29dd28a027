use serde::Deserialize;

/// Site root the built-in search targets
pub const DEFAULT_BASE_URL: &str = "https://www.zoopla.co.uk";

/// Two-bed E9 rentals between 1500 and 1750 per month, newest first
pub const DEFAULT_SEARCH_PATH: &str = "/to-rent/property/london/e9/homerton-south-hackney/?beds_min=2&include_shared_accommodation=false&price_frequency=per_month&price_max=1750&price_min=1500&q=E9&radius=0&results_sort=newest_listings&search_source=refine";

pub const DEFAULT_OUTPUT_PATH: &str = "availabilities.csv";

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing sections fall back
/// to the built-in search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Which site to crawl and where to start
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root every page path is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path and query of the first results page
    #[serde(rename = "search-path")]
    pub search_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Stop after this many result pages (unbounded when absent)
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// Optional URL or email appended to the user agent
    pub contact: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "availability-crawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file, overwritten on every run
    #[serde(rename = "output-path")]
    pub output_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}
