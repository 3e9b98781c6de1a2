//! # Loader Module
//!
//! Bulk ingestion of track records into a [`Catalog`].
//!
//! ## Delimited Format
//!
//! One record per line, five comma-separated fields:
//!
//! ```text
//! # title, artist, album, genre, duration
//! Echo, Nadia Vale, Signals, Synthpop, 3.75
//! Aurora, The Lanterns, Northbound, Indie, 4.10
//! ```
//!
//! Whitespace around each field is trimmed. Blank lines are ignored, and so
//! are lines starting with `#` that do not form a record (a title such as
//! `#1 Crush` still loads). A malformed line, including one that is not valid
//! UTF-8, is logged and skipped; the rest of the file still loads.
//!
//! ## JSON Format
//!
//! Files ending in `.json` are read as an array of objects with the same
//! five fields.

use crate::catalog::Catalog;
use crate::record::Record;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const FIELD_COUNT: usize = 5;

/// Records parsed from a source, plus how many entries had to be dropped.
#[derive(Debug, Default)]
pub struct Batch {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Outcome of loading a source into a catalog.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Well-formed records found in the source.
    pub read: usize,
    /// Records that were new titles.
    pub inserted: usize,
    /// Malformed entries that were dropped.
    pub skipped: usize,
}

impl LoadSummary {
    /// Records ignored because their title was already cataloged.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.read - self.inserted
    }
}

/// Parse one delimited line into a [`Record`].
///
/// # Errors
///
/// Returns an error if the line does not hold exactly five fields or the
/// duration is not a finite, non-negative number.
///
/// # Examples
///
/// ```
/// use songbook::loader::parse_line;
///
/// let record = parse_line("  Echo , Nadia Vale, Signals, Synthpop, 3.75")?;
/// assert_eq!(record.title(), "Echo");
/// assert!(parse_line("Echo, Nadia Vale, Signals, 3.75").is_err());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn parse_line(line: &str) -> Result<Record> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [title, artist, album, genre, duration] = fields[..] else {
        anyhow::bail!("expected {FIELD_COUNT} comma-separated fields, found {}", fields.len());
    };

    let duration: f64 = duration
        .parse()
        .with_context(|| format!("invalid input: duration `{duration}' is not a number"))?;

    Record::new(title, artist, album, genre, duration)
}

/// Read every record from a delimited source.
///
/// # Errors
///
/// Only I/O failures are errors; malformed lines are counted in
/// [`Batch::skipped`].
pub fn read_delimited<R: BufRead>(reader: R) -> Result<Batch> {
    let mut batch = Batch::default();

    for (index, bytes) in reader.split(b'\n').enumerate() {
        let line_number = index + 1;
        let bytes = bytes.with_context(|| format!("Failed to read line {line_number}"))?;
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping line {line_number}: not valid UTF-8 ({e})");
                batch.skipped += 1;
                continue;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_line(trimmed) {
            Ok(record) => batch.records.push(record),
            // `#` only marks a comment when the line is not a record itself.
            Err(_) if trimmed.starts_with('#') => {}
            Err(e) => {
                warn!("Skipping line {line_number}: {e:#}");
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

/// Read every record from a JSON array.
///
/// # Errors
///
/// Returns an error if the source is not a JSON array of record objects.
/// Objects that parse but hold an invalid duration are skipped instead.
pub fn read_json<R: Read>(reader: R) -> Result<Batch> {
    let raw: Vec<Record> =
        serde_json::from_reader(reader).context("Failed to parse JSON catalog")?;

    let mut batch = Batch::default();
    for (index, record) in raw.into_iter().enumerate() {
        match record.validated() {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!("Skipping JSON entry {index}: {e:#}");
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

/// Insert a parsed batch into `catalog`.
pub fn load_batch(catalog: &mut Catalog, batch: Batch) -> LoadSummary {
    let read = batch.records.len();
    let inserted = catalog.bulk_load(batch.records);
    LoadSummary {
        read,
        inserted,
        skipped: batch.skipped,
    }
}

/// Load the catalog file at `path` into `catalog`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or if a JSON file
/// is not structurally valid.
pub fn load_into(catalog: &mut Catalog, path: &Path) -> Result<LoadSummary> {
    let file = File::open(path)
        .with_context(|| format!("Could not open catalog file {}", path.display()))?;
    let reader = BufReader::new(file);

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let batch = if is_json {
        debug!("Reading {} as JSON", path.display());
        read_json(reader)
    } else {
        debug!("Reading {} as delimited text", path.display());
        read_delimited(reader)
    }
    .with_context(|| format!("Failed to load catalog from {}", path.display()))?;

    let summary = load_batch(catalog, batch);
    info!(
        "Loaded {} songs from {} ({} duplicates ignored, {} lines skipped)",
        summary.inserted,
        path.display(),
        summary.duplicates(),
        summary.skipped
    );
    Ok(summary)
}

/// Build a fresh catalog from the file at `path`.
///
/// # Errors
///
/// See [`load_into`].
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    load_into(&mut catalog, path)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
# title, artist, album, genre, duration
Zephyr, Gale Force, Trade Winds, Ambient, 5.20
Aurora, The Lanterns, Northbound, Indie, 4.10

Mosaic,Tess Ortiz,Fragments,Jazz,6.00
Echo, Nadia Vale, Signals, Synthpop, 3.75
";

    #[test]
    fn test_parse_line_trims_fields() {
        let record = parse_line(" Mosaic ,  Tess Ortiz,Fragments ,Jazz,  6.0 ").unwrap();
        assert_eq!(record.title(), "Mosaic");
        assert_eq!(record.artist(), "Tess Ortiz");
        assert_eq!(record.album(), "Fragments");
        assert_eq!(record.genre(), "Jazz");
        assert_eq!(record.duration(), 6.0);
    }

    #[test]
    fn test_parse_line_rejects_wrong_field_count() {
        assert!(parse_line("Echo, Nadia Vale, Signals, Synthpop").is_err());
        assert!(parse_line("Echo, Nadia Vale, Signals, Synthpop, 3.75, extra").is_err());
    }

    #[test]
    fn test_parse_line_rejects_bad_duration() {
        let err = parse_line("Echo, Nadia Vale, Signals, Synthpop, soon").unwrap_err();
        assert!(format!("{err:#}").contains("invalid input"));
        assert!(parse_line("Echo, Nadia Vale, Signals, Synthpop, -3").is_err());
        assert!(parse_line("Echo, Nadia Vale, Signals, Synthpop, inf").is_err());
    }

    #[test]
    fn test_read_delimited_skips_comments_and_blank_lines() {
        let batch = read_delimited(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(batch.records.len(), 4);
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn test_read_delimited_continues_past_malformed_lines() {
        let source = "A, x, y, z, 1.0\nnot a record\nB, x, y, z, oops\nC, x, y, z, 2.0\n";
        let batch = read_delimited(Cursor::new(source)).unwrap();
        let titles: Vec<&str> = batch.records.iter().map(Record::title).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(batch.skipped, 2);
    }

    #[test]
    fn test_read_delimited_skips_invalid_utf8_line() {
        let source: &[u8] = b"A, x, y, z, 1.0\nB\xff, x, y, z, 2.0\nC, x, y, z, 3.0\n";
        let batch = read_delimited(Cursor::new(source)).unwrap();
        let titles: Vec<&str> = batch.records.iter().map(Record::title).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn test_read_delimited_keeps_titles_starting_with_hash() {
        let source = "# a comment\n#1 Crush, Garbage, OST, Rock, 4.0\n";
        let batch = read_delimited(Cursor::new(source)).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].title(), "#1 Crush");
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn test_read_delimited_handles_crlf_and_missing_final_newline() {
        let batch = read_delimited(Cursor::new("A, x, y, z, 1.0\r\nB, x, y, z, 2.0")).unwrap();
        let titles: Vec<&str> = batch.records.iter().map(Record::title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_load_batch_reports_duplicates() {
        let source = "A, x, y, z, 1.0\nA, other, y, z, 9.0\nB, x, y, z, 2.0\n";
        let mut catalog = Catalog::new();
        let summary = load_batch(&mut catalog, read_delimited(Cursor::new(source)).unwrap());

        assert_eq!(summary, LoadSummary { read: 3, inserted: 2, skipped: 0 });
        assert_eq!(summary.duplicates(), 1);
        assert_eq!(catalog.search("A").unwrap().artist(), "x");
    }

    #[test]
    fn test_read_json() {
        let source = r#"[
            {"title": "Echo", "artist": "Nadia Vale", "album": "Signals", "genre": "Synthpop", "duration": 3.75},
            {"title": "Bad", "artist": "", "album": "", "genre": "", "duration": -1.0}
        ]"#;
        let batch = read_json(Cursor::new(source)).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn test_read_json_rejects_non_array() {
        assert!(read_json(Cursor::new(r#"{"title": "Echo"}"#)).is_err());
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("songs.txt");
        std::fs::write(&path, SAMPLE).unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.root_title(), Some("Mosaic"));
    }

    #[test]
    fn test_load_catalog_picks_json_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("songs.JSON");
        std::fs::write(
            &path,
            r#"[{"title": "Echo", "artist": "Nadia Vale", "album": "Signals", "genre": "Synthpop", "duration": 3.75}]"#,
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert!(catalog.search("Echo").is_some());
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_catalog(&dir.path().join("missing.txt")).unwrap_err();
        assert!(err.to_string().contains("Could not open catalog file"));
    }
}
