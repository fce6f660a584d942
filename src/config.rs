use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const BASE_URL: &str = "https://quotes.toscrape.com/";
pub const DATA_DIR: &str = "data";
pub const DEFAULT_PAGES: usize = 2;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const TIMEOUT_SECS: u64 = 10;

/// Everything the scrape pipeline needs, passed around explicitly so tests
/// can point it at scripted pages and a temp directory.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: Url,
    pub data_dir: PathBuf,
    pub user_agent: String,
    pub accept_language: String,
    pub timeout: Duration,
    pub max_pages: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("BASE_URL is a valid URL"),
            data_dir: PathBuf::from(DATA_DIR),
            user_agent: USER_AGENT.to_string(),
            accept_language: ACCEPT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            max_pages: DEFAULT_PAGES,
        }
    }
}

impl ScrapeConfig {
    pub fn with_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production_site() {
        let config = ScrapeConfig::default();
        assert_eq!(config.base_url.as_str(), "https://quotes.toscrape.com/");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.max_pages, 2);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn builder_overrides() {
        let config = ScrapeConfig::default()
            .with_pages(5)
            .with_data_dir(PathBuf::from("/tmp/out"));
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/out"));
    }
}
