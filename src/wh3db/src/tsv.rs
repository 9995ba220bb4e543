//! RPFM TSV export parsing.
//!
//! `rpfm_cli pack extract --tables-as-tsv` writes each DB table as a
//! tab-separated file with a fixed layout: a column-name header, a
//! `#<table>;<version>;...` metadata row, then one line per record.

use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsvError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No columns found (empty file?): {0}")]
    Empty(String),

    #[error("Invalid file format (not an RPFM .tsv?): {0}")]
    MissingMetadata(String),

    #[error("{path}: row {row} has {found} fields, expected {expected}")]
    ColumnCountMismatch {
        path: String,
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// A single DB table as exported by RPFM.
///
/// Immutable once parsed; `table_name` and `version` come from the
/// metadata row and drive schema lookup during conversion.
#[derive(Debug, Clone)]
pub struct TableExport {
    pub table_name: String,
    pub version: u32,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableExport {
    /// Read and parse an RPFM TSV file.
    pub fn from_file(path: &Path) -> Result<Self, TsvError> {
        let contents = fs::read_to_string(path).map_err(|source| TsvError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse TSV text. `origin` is used in error messages (usually the
    /// source file path).
    pub fn parse(contents: &str, origin: &str) -> Result<Self, TsvError> {
        // A blank line ends the record stream, matching the exporter's
        // trailing-newline behavior.
        let mut lines = contents
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .take_while(|line| !line.trim().is_empty());

        let header = lines.next().ok_or_else(|| TsvError::Empty(origin.to_string()))?;
        let columns: Vec<String> = header.split('\t').map(str::to_string).collect();

        let metadata = lines
            .next()
            .and_then(parse_metadata)
            .ok_or_else(|| TsvError::MissingMetadata(origin.to_string()))?;
        let (table_name, version) = metadata;

        let mut rows = Vec::new();
        for (index, line) in lines.enumerate() {
            let cells: Vec<String> = line.split('\t').map(str::to_string).collect();
            if cells.len() != columns.len() {
                return Err(TsvError::ColumnCountMismatch {
                    path: origin.to_string(),
                    row: index + 1,
                    found: cells.len(),
                    expected: columns.len(),
                });
            }
            rows.push(cells);
        }

        Ok(TableExport {
            table_name,
            version,
            columns,
            rows,
        })
    }
}

/// Parse the `#<table>;<version>;...` metadata row.
fn parse_metadata(line: &str) -> Option<(String, u32)> {
    let rest = line.strip_prefix('#')?;
    let mut parts = rest.split(';');

    let name = parts.next()?;
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    let version = parts.next()?.parse().ok()?;

    Some((name.to_string(), version))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "key\tcount\n#units_tables;2;db/units_tables/data__\nspearmen\t120\narchers\t80\n";

    #[test]
    fn test_parse_sample() {
        let export = TableExport::parse(SAMPLE, "sample.tsv").unwrap();
        assert_eq!(export.table_name, "units_tables");
        assert_eq!(export.version, 2);
        assert_eq!(export.columns, vec!["key", "count"]);
        assert_eq!(export.rows.len(), 2);
        assert_eq!(export.rows[0], vec!["spearmen", "120"]);
        assert_eq!(export.rows[1], vec!["archers", "80"]);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let contents = "key\tcount\r\n#units_tables;2;\r\na\t1\r\n";
        let export = TableExport::parse(contents, "crlf.tsv").unwrap();
        assert_eq!(export.rows, vec![vec!["a", "1"]]);
    }

    #[test]
    fn test_blank_line_ends_records() {
        let contents = "key\tcount\n#units_tables;2;\na\t1\n\nb\t2\n";
        let export = TableExport::parse(contents, "blank.tsv").unwrap();
        assert_eq!(export.rows.len(), 1);
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = TableExport::parse("", "empty.tsv").unwrap_err();
        assert!(matches!(err, TsvError::Empty(_)));
    }

    #[test]
    fn test_missing_metadata_rejected() {
        let contents = "key\tcount\na\t1\n";
        let err = TableExport::parse(contents, "plain.tsv").unwrap_err();
        assert!(matches!(err, TsvError::MissingMetadata(_)));
    }

    #[test]
    fn test_column_count_mismatch_rejected() {
        let contents = "key\tcount\n#units_tables;2;\na\t1\nb\t2\textra\n";
        let err = TableExport::parse(contents, "bad.tsv").unwrap_err();
        match err {
            TsvError::ColumnCountMismatch {
                row,
                found,
                expected,
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(found, 3);
                assert_eq!(expected, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_metadata_without_version_rejected() {
        let contents = "key\n#units_tables\na\n";
        let err = TableExport::parse(contents, "nometa.tsv").unwrap_err();
        assert!(matches!(err, TsvError::MissingMetadata(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = TableExport::from_file(Path::new("/nonexistent/input.tsv")).unwrap_err();
        assert!(matches!(err, TsvError::Io { .. }));
    }
}
