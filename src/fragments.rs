//! Fragment loading from CSV files.
//!
//! Every field of every record is flattened, in reading order, into one
//! sequence. Row boundaries are not kept.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

/// Failure to read a fragment file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened
    #[error("cannot open {path}: {source}")]
    Io {
        /// Path as given
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
    /// The contents are not valid UTF-8 CSV
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Read `path` and flatten its fields into one fragment list.
pub fn load_file(path: &Path) -> Result<Vec<String>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let fragments = parse(file)?;
    info!(
        "Loaded {} fragments from {}",
        fragments.len(),
        path.display()
    );

    Ok(fragments)
}

/// Flatten CSV records from any reader.
pub fn parse<R: Read>(reader: R) -> Result<Vec<String>, LoadError> {
    let mut rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut fragments = Vec::new();
    for record in rows.records() {
        let record = record?;
        debug!("Record with {} fields", record.len());
        fragments.extend(record.iter().map(str::to_string));
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flattens_rows_in_reading_order() {
        let fragments = parse("a,b,c\nd,e\n\nf\n".as_bytes()).expect("parse");
        assert_eq!(fragments, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn keeps_quoted_commas_and_empty_fields() {
        let fragments = parse("\"hello, world\",,x\n".as_bytes()).expect("parse");
        assert_eq!(fragments, vec!["hello, world", "", "x"]);
    }

    #[test]
    fn empty_input_is_an_empty_sequence() {
        assert!(parse("".as_bytes()).expect("parse").is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_csv_error() {
        let err = parse(&[0x66, 0xff, 0xfe, b'\n'][..]).expect_err("invalid utf-8");
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_file(&dir.path().join("absent.csv")).expect_err("missing");
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn loads_unicode_fragments_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "こんにちは,世界").expect("write");
        writeln!(file, "ok").expect("write");

        let fragments = load_file(file.path()).expect("load");
        assert_eq!(fragments, vec!["こんにちは", "世界", "ok"]);
    }
}
