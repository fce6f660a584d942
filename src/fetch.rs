use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::StatusCode;
use scraper::Html;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ScrapeConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { url: Url, status: StatusCode },
}

/// Source of parsed pages. Production fetches over HTTP; tests script it.
pub trait FetchPage {
    fn fetch(&self, url: &Url) -> Result<Html, FetchError>;
}

/// HTTP fetcher over one shared client, so connections and headers behave
/// like a browser session across pages.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .context("invalid Accept-Language value")?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Html, FetchError> {
        debug!(url = %url, "fetching page");
        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        let body = response.text()?;
        Ok(Html::parse_document(&body))
    }
}
