use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const TAG_SEPARATOR: &str = "|";

/// Column order shared by the CSV header and the XLSX sheet.
pub const COLUMNS: [&str; 7] = [
    "quote",
    "author",
    "author_link",
    "tags",
    "tags_count",
    "first_tag",
    "fecha_extraccion",
];

const CURRENT_STEM: &str = "quotes_actual";
const HISTORY_DIR: &str = "historico";

/// One scraped quote, shaped exactly like an output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub quote: String,
    pub author: String,
    pub author_link: String,
    pub tags: String,
    pub tags_count: usize,
    pub first_tag: Option<String>,
    #[serde(rename = "fecha_extraccion")]
    pub extraction_date: NaiveDate,
}

impl QuoteRecord {
    /// Build a record from raw parts. The derived tag columns are computed
    /// here so `tags`, `tags_count` and `first_tag` always agree.
    pub fn new(
        quote: String,
        author: String,
        author_link: String,
        tags: Vec<String>,
        extraction_date: NaiveDate,
    ) -> Self {
        let first_tag = tags.first().cloned();
        Self {
            quote,
            author,
            author_link,
            tags_count: tags.len(),
            tags: tags.join(TAG_SEPARATOR),
            first_tag,
            extraction_date,
        }
    }
}

/// Where a snapshot pair landed on disk.
pub struct SnapshotPaths {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

/// Overwrite the current snapshot pair (`quotes_actual.csv` / `.xlsx`).
pub fn save_current(records: &[QuoteRecord], data_dir: &Path) -> Result<SnapshotPaths> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let csv = data_dir.join(format!("{}.csv", CURRENT_STEM));
    let xlsx = data_dir.join(format!("{}.xlsx", CURRENT_STEM));
    write_csv(records, &csv)?;
    write_xlsx(records, &xlsx)?;
    Ok(SnapshotPaths { csv, xlsx })
}

/// Write the dated snapshot pair under `historico/`. One pair per calendar
/// date; a second run the same day replaces it.
pub fn save_historical(
    records: &[QuoteRecord],
    data_dir: &Path,
    date: NaiveDate,
) -> Result<SnapshotPaths> {
    let dir = data_dir.join(HISTORY_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let stem = format!("quotes_{}", date.format("%Y-%m-%d"));
    let csv = dir.join(format!("{}.csv", stem));
    let xlsx = dir.join(format!("{}.xlsx", stem));
    write_csv(records, &csv)?;
    write_xlsx(records, &xlsx)?;
    Ok(SnapshotPaths { csv, xlsx })
}

/// Read the current CSV snapshot back, if there is one.
///
/// Missing or unreadable data maps to `None` (logged); callers treat that as
/// "nothing cached" rather than an error.
pub fn load_current(data_dir: &Path) -> Option<Vec<QuoteRecord>> {
    let path = data_dir.join(format!("{}.csv", CURRENT_STEM));
    let mut reader = match csv::Reader::from_path(&path) {
        Ok(reader) => reader,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "no current snapshot to load");
            return None;
        }
    };

    let mut records: Vec<QuoteRecord> = Vec::new();
    for row in reader.deserialize() {
        match row {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "current snapshot is malformed");
                return None;
            }
        }
    }
    Some(records)
}

fn write_csv(records: &[QuoteRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(records: &[QuoteRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, record.quote.as_str())?;
        sheet.write_string(row, 1, record.author.as_str())?;
        sheet.write_string(row, 2, record.author_link.as_str())?;
        sheet.write_string(row, 3, record.tags.as_str())?;
        sheet.write_number(row, 4, record.tags_count as f64)?;
        sheet.write_string(row, 5, record.first_tag.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 6, record.extraction_date.to_string())?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(author: &str, tags: &[&str]) -> QuoteRecord {
        QuoteRecord::new(
            format!("Something {} said.", author),
            author.to_string(),
            format!("https://quotes.toscrape.com/author/{}", author),
            tags.iter().map(|t| t.to_string()).collect(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        )
    }

    #[test]
    fn derived_tag_columns_agree() {
        let r = record("Einstein", &["change", "world"]);
        assert_eq!(r.tags, "change|world");
        assert_eq!(r.tags_count, 2);
        assert_eq!(r.first_tag.as_deref(), Some("change"));
    }

    #[test]
    fn no_tags_means_no_first_tag() {
        let r = record("Einstein", &[]);
        assert_eq!(r.tags, "");
        assert_eq!(r.tags_count, 0);
        assert!(r.first_tag.is_none());
    }

    #[test]
    fn current_snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record("Einstein", &["change"]), record("Rowling", &[])];

        let paths = save_current(&records, dir.path()).unwrap();
        assert!(paths.csv.exists());
        assert!(paths.xlsx.exists());

        let loaded = load_current(dir.path()).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn csv_header_matches_columns() {
        let dir = tempfile::tempdir().unwrap();
        save_current(&[record("Einstein", &["change"])], dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("quotes_actual.csv")).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn save_current_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        save_current(&[record("Einstein", &[]), record("Austen", &[])], dir.path()).unwrap();
        save_current(&[record("Rowling", &["choices"])], dir.path()).unwrap();

        let loaded = load_current(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].author, "Rowling");
    }

    #[test]
    fn historical_pair_is_named_after_date() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let paths = save_historical(&[record("Einstein", &[])], dir.path(), date).unwrap();
        assert_eq!(
            paths.csv,
            dir.path().join("historico").join("quotes_2025-01-15.csv")
        );
        assert_eq!(
            paths.xlsx,
            dir.path().join("historico").join("quotes_2025-01-15.xlsx")
        );
        assert!(paths.csv.exists());
        assert!(paths.xlsx.exists());
    }

    #[test]
    fn same_date_history_is_replaced_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        save_historical(&[record("Einstein", &[])], dir.path(), date).unwrap();
        save_historical(&[record("Rowling", &[])], dir.path(), date).unwrap();

        let entries = fs::read_dir(dir.path().join("historico")).unwrap().count();
        assert_eq!(entries, 2); // one csv + one xlsx

        let content =
            fs::read_to_string(dir.path().join("historico").join("quotes_2025-01-15.csv")).unwrap();
        assert!(content.contains("Rowling"));
        assert!(!content.contains("Einstein"));
    }

    #[test]
    fn load_current_without_snapshot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_current(dir.path()).is_none());
    }

    #[test]
    fn load_current_with_garbage_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes_actual.csv");
        fs::write(&path, "quote,author\nonly-two-fields,x\n").unwrap();
        assert!(load_current(dir.path()).is_none());
    }
}
