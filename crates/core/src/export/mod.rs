//! CSV export of parsed cvar records
//!
//! Writes a header row followed by one row per record, in the order the
//! records were parsed. Quoting follows RFC 4180: fields containing commas,
//! quotes or line breaks are quoted and inner quotes doubled.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cvars::CvarRecord;

/// Header row of the exported spreadsheet
pub const CSV_HEADER: [&str; 4] = ["name", "value", "flags", "description"];

/// Separator between flag tokens inside the flags column
pub const FLAG_SEPARATOR: &str = ",";

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Destination file could not be created
    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a row failed
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the destination failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Where the CSV goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDestination {
    /// Standard output
    Stdout,
    /// A file, created or truncated
    File(PathBuf),
}

impl ExportDestination {
    /// File destination if a path is given, stdout otherwise
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

impl std::fmt::Display for ExportDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Write records to a destination
///
/// Returns the number of data rows written.
pub fn write(records: &[CvarRecord], destination: &ExportDestination) -> ExportResult<usize> {
    match destination {
        ExportDestination::Stdout => write_csv(records, std::io::stdout().lock()),
        ExportDestination::File(path) => write_csv_file(records, path),
    }
}

/// Write records to a file, creating or truncating it
pub fn write_csv_file(records: &[CvarRecord], path: &Path) -> ExportResult<usize> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = write_csv(records, file)?;
    tracing::debug!("Wrote {} rows to {:?}", rows, path);
    Ok(rows)
}

/// Write records as CSV to any writer
pub fn write_csv<W: Write>(records: &[CvarRecord], writer: W) -> ExportResult<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for record in records {
        let flags = record.flags.join(FLAG_SEPARATOR);
        csv.write_record([
            record.name.as_str(),
            record.value.as_str(),
            flags.as_str(),
            record.description.as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, value: &str, flags: &[&str], description: &str) -> CvarRecord {
        CvarRecord::new(
            name,
            value,
            flags.iter().map(|f| f.to_string()).collect(),
            description,
        )
    }

    fn to_string(records: &[CvarRecord]) -> String {
        let mut out = Vec::new();
        write_csv(records, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_only() {
        assert_eq!(to_string(&[]), "name,value,flags,description\n");
    }

    #[test]
    fn test_single_record() {
        let csv = to_string(&[record("sv_cheats", "0", &["sv", "cheat"], "Allow cheats")]);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "name,value,flags,description");
        assert_eq!(lines[1], "sv_cheats,0,\"sv,cheat\",Allow cheats");
    }

    #[test]
    fn test_quoting() {
        let csv = to_string(&[record(
            "hostname",
            "My \"best\" server",
            &[],
            "line one\nline two, with comma",
        )]);

        assert_eq!(
            csv,
            "name,value,flags,description\n\
             hostname,\"My \"\"best\"\" server\",,\"line one\nline two, with comma\"\n"
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let records = [
            record("zeta", "1", &[], ""),
            record("alpha", "2", &[], ""),
        ];
        let csv = to_string(&records);
        let names: Vec<&str> = csv
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap_or(""))
            .collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cvars.csv");

        let rows = write(
            &[record("sv_gravity", "800", &["sv", "rep"], "World gravity")],
            &ExportDestination::File(path.clone()),
        )
        .unwrap();

        assert_eq!(rows, 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("name,value,flags,description\n"));
        assert!(content.contains("sv_gravity,800,\"sv,rep\",World gravity"));
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cvars.csv");

        let err = write_csv_file(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
    }

    #[test]
    fn test_destination_from_option() {
        assert_eq!(ExportDestination::from_option(None), ExportDestination::Stdout);
        assert_eq!(
            ExportDestination::from_option(Some(PathBuf::from("out.csv"))),
            ExportDestination::File(PathBuf::from("out.csv"))
        );
    }
}
