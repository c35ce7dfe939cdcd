//! Acquisition drivers
//!
//! Two ways to obtain `cvarlist` text, one way to export it:
//!
//! - rcon: connect, authenticate, run the command, close
//! - manual: read a captured dump from a file or stdin
//!
//! Both feed [`CvarDump::parse`] and then [`export::write`].

use std::io::Read;
use std::path::{Path, PathBuf};

use cvardump_rcon::{RconError, Session};

use crate::config::CvardumpConfig;
use crate::cvars::CvarDump;
use crate::export::{self, ExportDestination, ExportError};

/// Errors from a dump run
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// Network or protocol failure in rcon mode
    #[error(transparent)]
    Rcon(#[from] RconError),

    /// Manual input could not be read
    #[error("Failed to read input from {source_name}: {source}")]
    Input {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV could not be written
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for dump runs
pub type DumpResult<T> = Result<T, DumpError>;

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpSummary {
    /// Data rows written
    pub records: usize,
    /// Unparsable lines
    pub skipped: usize,
    /// Duplicate names dropped
    pub duplicates: usize,
    /// Count reported by the engine, if any
    pub reported_total: Option<usize>,
}

/// Fetch `cvarlist` output from a live server
///
/// The session is closed on every path, including failures.
#[tracing::instrument(skip(password, config))]
pub fn fetch_rcon(address: &str, password: &str, config: &CvardumpConfig) -> DumpResult<String> {
    let mut session = Session::connect(address, &config.rcon_config())?;
    session.authenticate(password)?;
    let text = session.execute_command(&config.command)?;
    session.close();

    tracing::info!("Received {} bytes of '{}' output", text.len(), config.command);
    Ok(text)
}

/// Read a captured dump from a file, or from stdin when no path is given
pub fn read_manual(input: Option<&Path>) -> DumpResult<String> {
    match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| DumpError::Input {
            source_name: path.display().to_string(),
            source,
        }),
        None => read_input(std::io::stdin().lock(), "<stdin>"),
    }
}

/// Read a whole dump from any reader
pub fn read_input<R: Read>(mut reader: R, source_name: &str) -> DumpResult<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| DumpError::Input {
            source_name: source_name.to_string(),
            source,
        })?;
    Ok(text)
}

/// Parse a dump and write it as CSV
pub fn export_text(text: &str, destination: &ExportDestination) -> DumpResult<DumpSummary> {
    let dump = CvarDump::parse(text);

    if dump.skipped > 0 {
        tracing::warn!("Skipped {} unparsable line(s)", dump.skipped);
    }
    if dump.duplicates > 0 {
        tracing::warn!(
            "Dropped {} duplicate cvar(s), kept first occurrences",
            dump.duplicates
        );
    }
    if !dump.matches_reported_total() {
        tracing::warn!(
            "Extracted {} cvars but the server reported {}",
            dump.parsed_lines(),
            dump.reported_total.unwrap_or_default()
        );
    }

    let records = export::write(&dump.records, destination)?;
    tracing::info!("Exported {} cvars to {}", records, destination);

    Ok(DumpSummary {
        records,
        skipped: dump.skipped,
        duplicates: dump.duplicates,
        reported_total: dump.reported_total,
    })
}

/// rcon mode: fetch from a live server, then export
pub fn run_rcon(
    address: &str,
    password: &str,
    destination: &ExportDestination,
    config: &CvardumpConfig,
) -> DumpResult<DumpSummary> {
    let text = fetch_rcon(address, password, config)?;
    export_text(&text, destination)
}

/// manual mode: read a captured dump, then export
pub fn run_manual(
    input: Option<PathBuf>,
    destination: &ExportDestination,
) -> DumpResult<DumpSummary> {
    let text = read_manual(input.as_deref())?;
    export_text(&text, destination)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::TcpListener;

    use cvardump_rcon::PacketCodec;

    use super::*;

    fn frame(request_id: i32, code: i32, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&((body.len() + 10) as i32).to_le_bytes());
        out.extend_from_slice(&request_id.to_le_bytes());
        out.extend_from_slice(&code.to_le_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(&[0, 0]);
        out
    }

    #[test]
    fn test_manual_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cvarlist.txt");
        let output = dir.path().join("cvars.csv");
        std::fs::write(&input, "sv_cheats : 0 : sv, cheat : \"Allow cheats\"\n").unwrap();

        let summary = run_manual(Some(input), &ExportDestination::File(output.clone())).unwrap();

        assert_eq!(summary.records, 1);
        let csv = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            [
                "name,value,flags,description",
                "sv_cheats,0,\"sv,cheat\",Allow cheats"
            ]
        );
    }

    #[test]
    fn test_manual_garbage_line_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cvarlist.txt");
        let output = dir.path().join("cvars.csv");
        std::fs::write(
            &input,
            "sv_cheats : 0 : sv, cheat : \"Allow cheats\"\n#### garbage ####\n",
        )
        .unwrap();

        let summary = run_manual(Some(input), &ExportDestination::File(output.clone())).unwrap();

        assert_eq!(summary.records, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(std::fs::read_to_string(&output).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_manual_empty_input_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        let output = dir.path().join("cvars.csv");
        std::fs::write(&input, "").unwrap();

        let summary = run_manual(Some(input), &ExportDestination::File(output.clone())).unwrap();

        assert_eq!(summary.records, 0);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "name,value,flags,description\n"
        );
    }

    #[test]
    fn test_manual_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_manual(
            Some(dir.path().join("missing.txt")),
            &ExportDestination::File(dir.path().join("cvars.csv")),
        )
        .unwrap_err();

        assert!(matches!(err, DumpError::Input { .. }));
    }

    #[test]
    fn test_read_input_from_reader() {
        let text = read_input("a : 1 : : b".as_bytes(), "test").unwrap();
        assert_eq!(text, "a : 1 : : b");
    }

    #[test]
    fn test_rcon_end_to_end() {
        let listing = "cvar list\n--------------\n\
            sv_cheats : 0 : , \"sv\", \"rep\", \"nf\" : Allow cheats on server\n\
            sv_gravity : 800 : , \"sv\", \"rep\", \"nf\" : World gravity.\n\
            --------------\n  2 total convars/concommands\n";

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let codec = PacketCodec::server();
            while let Ok(packet) = codec.decode(&mut stream) {
                let replies: Vec<Vec<u8>> = match packet.request_id {
                    // auth
                    1 => vec![frame(1, 0, b""), frame(1, 2, b"")],
                    // command, split in 10-byte packets
                    2 => listing
                        .as_bytes()
                        .chunks(10)
                        .map(|chunk| frame(2, 0, chunk))
                        .collect(),
                    // probe
                    id => vec![frame(id, 0, b""), frame(id, 0, &[0, 1, 0, 0])],
                };
                for reply in replies {
                    if stream.write_all(&reply).is_err() {
                        return;
                    }
                }
            }
        });

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cvars.csv");
        let summary = run_rcon(
            &address,
            "secret",
            &ExportDestination::File(output.clone()),
            &CvardumpConfig::default(),
        )
        .unwrap();
        server.join().unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.reported_total, Some(2));
        let csv = std::fs::read_to_string(&output).unwrap();
        assert!(csv.contains("sv_gravity,800,\"sv,rep,nf\",World gravity."));
    }

    #[test]
    fn test_rcon_auth_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            if let Ok(packet) = PacketCodec::server().decode(&mut stream) {
                let _ = stream.write_all(&frame(packet.request_id, 0, b""));
                let _ = stream.write_all(&frame(-1, 2, b""));
            }
        });

        let err = fetch_rcon(&address, "wrong", &CvardumpConfig::default()).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, DumpError::Rcon(RconError::Auth)));
    }
}
