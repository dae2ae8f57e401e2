//! Output formatting for tables and run summaries.
//!
//! Supports CSV export (optionally gzip-compressed), CSV to any writer and
//! JSON logging of serializable summaries.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::table::{Table, value_to_string};

/// Logs a serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `table` as CSV, header first, to `writer`.
pub fn write_csv<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(&table.columns)?;
    for row in &table.rows {
        csv.write_record(row.iter().map(value_to_string))?;
    }
    csv.flush()?;
    Ok(())
}

/// Exports `table` to a CSV file at `path`, replacing any existing file.
///
/// With `gzip` the file is gzip-compressed; the caller picks the file name.
pub fn export_csv(path: &Path, table: &Table, gzip: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    debug!(path = %path.display(), gzip, rows = table.len(), "Exporting CSV");

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_csv(&mut encoder, table)?;
        encoder.finish()?;
    } else {
        write_csv(file, table)?;
    }

    info!(path = %path.display(), rows = table.len(), "CSV export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use rusqlite::types::Value;
    use std::io::Read;
    use tempfile::TempDir;

    fn sample() -> Table {
        Table {
            columns: vec!["bowler".into(), "economy".into(), "avg".into()],
            rows: vec![
                vec![Value::Text("K, Jr".into()), Value::Real(4.5), Value::Null],
                vec![Value::Text("M".into()), Value::Real(6.0), Value::Real(21.33)],
            ],
        }
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&vec!["odi", "t20"]).unwrap();
    }

    #[test]
    fn test_write_csv_quotes_and_nulls() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample()).unwrap();

        let content = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["bowler,economy,avg", "\"K, Jr\",4.5,", "M,6,21.33"]);
    }

    #[test]
    fn test_write_csv_empty_table_has_header_only() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &Table::empty(&["team", "wins"])).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "team,wins\n");
    }

    #[test]
    fn test_export_csv_plain() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("bowling.csv");

        export_csv(&path, &sample(), false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_export_csv_gzip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bowling.csv.gz");

        export_csv(&path, &sample(), true).unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert!(decoded.starts_with("bowler,economy,avg\n"));
        assert_eq!(decoded.lines().count(), 3);
    }
}
