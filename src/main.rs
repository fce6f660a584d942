mod config;
mod events;
mod extract;
mod fetch;
mod scrape;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};

use crate::config::ScrapeConfig;
use crate::events::LogSink;
use crate::fetch::HttpFetcher;

#[derive(Parser)]
#[command(
    name = "quotes_scraper",
    about = "quotes.toscrape.com scraper with CSV/XLSX snapshots"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape quotes and write the current + dated snapshot files
    Scrape {
        /// Max pages to fetch
        #[arg(short = 'n', long, default_value = "2")]
        pages: usize,
        /// Root directory for the output files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Preview rows from the saved current snapshot
    Show {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        /// Root directory the snapshot was written to
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    // Bare invocation behaves like `scrape` with its defaults.
    let result = match cli.command {
        Some(Commands::Scrape { pages, data_dir }) => run_scrape(pages, data_dir),
        Some(Commands::Show { limit, data_dir }) => run_show(limit, data_dir),
        None => run_scrape(config::DEFAULT_PAGES, PathBuf::from(config::DATA_DIR)),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn run_scrape(pages: usize, data_dir: PathBuf) -> Result<()> {
    let config = ScrapeConfig::default()
        .with_pages(pages)
        .with_data_dir(data_dir);
    // One date per run: every record and the history filename share it.
    let date = Local::now().date_naive();
    let fetcher = HttpFetcher::new(&config)?;
    let mut sink = LogSink;

    println!(
        "Scraping up to {} pages from {} ...",
        config.max_pages, config.base_url
    );
    let outcome = scrape::scrape_quotes(&fetcher, &config, date, &mut sink);

    if outcome.quotes.is_empty() {
        println!(
            "No quotes scraped ({} pages ok, {} failed). Nothing saved.",
            outcome.pages_ok, outcome.pages_failed
        );
        return Ok(());
    }

    let current = store::save_current(&outcome.quotes, &config.data_dir)?;
    let history = store::save_historical(&outcome.quotes, &config.data_dir, date)?;

    println!(
        "Scraped {} quotes ({} pages ok, {} failed).",
        outcome.quotes.len(),
        outcome.pages_ok,
        outcome.pages_failed
    );
    println!("Current:  {}", current.csv.display());
    println!("          {}", current.xlsx.display());
    println!("History:  {}", history.csv.display());
    println!("          {}", history.xlsx.display());
    Ok(())
}

fn run_show(limit: usize, data_dir: PathBuf) -> Result<()> {
    let records = match store::load_current(&data_dir) {
        Some(records) => records,
        None => {
            println!(
                "No current snapshot in {}. Run 'scrape' first.",
                data_dir.display()
            );
            return Ok(());
        }
    };
    if records.is_empty() {
        println!("Current snapshot is empty.");
        return Ok(());
    }

    println!(
        "{:>3} | {:<50} | {:<20} | {:>4} | {:<16}",
        "#", "Quote", "Author", "Tags", "First tag"
    );
    println!("{}", "-".repeat(105));

    for (i, r) in records.iter().take(limit).enumerate() {
        println!(
            "{:>3} | {:<50} | {:<20} | {:>4} | {:<16}",
            i + 1,
            truncate(&r.quote, 50),
            truncate(&r.author, 20),
            r.tags_count,
            r.first_tag.as_deref().unwrap_or("-"),
        );
    }

    println!(
        "\n{} quotes | extracted {}",
        records.len(),
        records[0].extraction_date
    );
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
