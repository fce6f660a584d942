use chrono::NaiveDate;

use crate::config::ScrapeConfig;
use crate::events::{EventSink, ScrapeEvent};
use crate::extract::{extract_page, successor_url};
use crate::fetch::FetchPage;
use crate::store::QuoteRecord;

/// Totals for one scrape run.
pub struct ScrapeOutcome {
    pub quotes: Vec<QuoteRecord>,
    pub pages_ok: usize,
    pub pages_failed: usize,
}

/// Walk the site page by page, collecting quotes in discovery order.
///
/// Fetch and extraction failures never escape: they go to the sink as events
/// and the loop moves on, or stops when there is nowhere left to go. On a
/// fetch failure the next page is derived from the failed URL's page number;
/// the landing URL has none, so a first-page failure ends the run.
pub fn scrape_quotes(
    fetcher: &dyn FetchPage,
    config: &ScrapeConfig,
    date: NaiveDate,
    sink: &mut dyn EventSink,
) -> ScrapeOutcome {
    let mut quotes = Vec::new();
    let mut pages_ok = 0usize;
    let mut pages_failed = 0usize;

    let mut pending = Some(config.base_url.clone());
    let mut page = 1usize;

    while page <= config.max_pages {
        let url = match pending.take() {
            Some(url) => url,
            None => break,
        };

        match fetcher.fetch(&url) {
            Ok(doc) => {
                let extracted = extract_page(&doc, &config.base_url, date);
                for reason in extracted.skipped {
                    sink.notify(ScrapeEvent::QuoteSkipped { page, reason });
                }
                sink.notify(ScrapeEvent::PageScraped {
                    page,
                    count: extracted.quotes.len(),
                });
                quotes.extend(extracted.quotes);
                pages_ok += 1;
                pending = extracted.next_url;
            }
            Err(error) => {
                pages_failed += 1;
                pending = successor_url(&url);
                sink.notify(ScrapeEvent::PageFailed { page, url, error });
            }
        }

        page += 1;
    }

    ScrapeOutcome {
        quotes,
        pages_ok,
        pages_failed,
    }
}
