use tracing::{info, warn};
use url::Url;

use crate::extract::SkipReason;
use crate::fetch::FetchError;

/// What happened while scraping, delivered to whichever sink the caller
/// injected. Nothing here is fatal; the loop always keeps its own counters.
#[derive(Debug)]
pub enum ScrapeEvent {
    PageScraped {
        page: usize,
        count: usize,
    },
    PageFailed {
        page: usize,
        url: Url,
        error: FetchError,
    },
    QuoteSkipped {
        page: usize,
        reason: SkipReason,
    },
}

pub trait EventSink {
    fn notify(&mut self, event: ScrapeEvent);
}

/// Default sink: forwards everything to the tracing subscriber.
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&mut self, event: ScrapeEvent) {
        match event {
            ScrapeEvent::PageScraped { page, count } => {
                info!(page, count, "page scraped");
            }
            ScrapeEvent::PageFailed { page, url, error } => {
                warn!(page, url = %url, error = %error, "page fetch failed");
            }
            ScrapeEvent::QuoteSkipped { page, reason } => {
                warn!(page, reason = %reason, "quote block skipped");
            }
        }
    }
}
