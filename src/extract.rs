use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use crate::store::QuoteRecord;

static QUOTE_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.quote").unwrap());
static QUOTE_TEXT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.text").unwrap());
static AUTHOR_NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("small.author").unwrap());
static AUTHOR_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span > a[href]").unwrap());
static TAG_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.tag").unwrap());
static NEXT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.next > a[href]").unwrap());

// ASCII double quote plus the typographic pair the site wraps quotes in.
const QUOTE_MARKS: &[char] = &['"', '\u{201C}', '\u{201D}'];

/// Why one quote block was dropped. The rest of the page is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("quote text not found")]
    MissingText,
    #[error("author name not found")]
    MissingAuthor,
    #[error("author link not found")]
    MissingAuthorLink,
}

/// Everything one page yields: the records, the blocks that had to be
/// skipped, and the pagination link if the page has one.
pub struct PageExtract {
    pub quotes: Vec<QuoteRecord>,
    pub skipped: Vec<SkipReason>,
    pub next_url: Option<Url>,
}

/// Pull all quote blocks out of a parsed page. Malformed blocks are recorded
/// in `skipped` and extraction moves on to the next block.
pub fn extract_page(doc: &Html, base: &Url, date: NaiveDate) -> PageExtract {
    let mut quotes = Vec::new();
    let mut skipped = Vec::new();

    for block in doc.select(&QUOTE_BLOCK) {
        match extract_quote(block, base, date) {
            Ok(record) => quotes.push(record),
            Err(reason) => skipped.push(reason),
        }
    }

    let next_url = doc
        .select(&NEXT_LINK)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| base.join(href).ok());

    PageExtract {
        quotes,
        skipped,
        next_url,
    }
}

fn extract_quote(block: ElementRef, base: &Url, date: NaiveDate) -> Result<QuoteRecord, SkipReason> {
    let text = block
        .select(&QUOTE_TEXT)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or(SkipReason::MissingText)?;

    let author = block
        .select(&AUTHOR_NAME)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or(SkipReason::MissingAuthor)?;

    // The "(about)" anchor next to the author name. Tag links live under
    // div.tags, so they never match span > a.
    let href = block
        .select(&AUTHOR_LINK)
        .next()
        .and_then(|el| el.value().attr("href"))
        .ok_or(SkipReason::MissingAuthorLink)?;
    let author_link = base.join(href).map_err(|_| SkipReason::MissingAuthorLink)?;

    let tags: Vec<String> = block
        .select(&TAG_LINK)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();

    Ok(QuoteRecord::new(
        clean_quote_text(&text),
        author,
        author_link.to_string(),
        tags,
        date,
    ))
}

fn clean_quote_text(raw: &str) -> String {
    raw.trim().trim_matches(QUOTE_MARKS).to_string()
}

/// Derive `/page/N+1/` from a pagination URL `/page/N/`. Returns `None` for
/// URLs that carry no page number, like the landing page.
pub fn successor_url(url: &Url) -> Option<Url> {
    let mut segments: Vec<String> = url.path_segments()?.map(|s| s.to_string()).collect();
    let idx = segments.iter().position(|s| s == "page")?;
    let n: u32 = segments.get(idx + 1)?.parse().ok()?;
    segments[idx + 1] = (n + 1).to_string();

    let mut next = url.clone();
    next.set_path(&segments.join("/"));
    Some(next)
}
