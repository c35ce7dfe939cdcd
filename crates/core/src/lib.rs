//! cvardump core - Cvar Listing Extraction
//!
//! This crate turns `cvarlist` output into a CSV spreadsheet:
//! - [`cvars`] - tolerant parser producing ordered, de-duplicated records
//! - [`export`] - CSV writer
//! - [`dump`] - rcon and manual acquisition drivers
//! - [`config`] - TOML configuration
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and rcon crates for convenience:
//! - [`sdk`] - RCON wire constants
//! - [`rcon`] - RCON session client

use tracing::info;

// Re-export SDK and rcon crates
pub use cvardump_rcon as rcon;
pub use cvardump_sdk as sdk;

pub mod config;
pub mod cvars;
pub mod dump;
pub mod export;

// Re-export commonly used items
pub use config::{ConfigError, ConfigResult, CvardumpConfig};
pub use cvars::{CvarDump, CvarRecord};
pub use dump::{run_manual, run_rcon, DumpError, DumpResult, DumpSummary};
pub use export::{ExportDestination, ExportError};

/// Log the outcome of a finished run
pub fn report_summary(summary: &DumpSummary) {
    info!(
        records = summary.records,
        skipped = summary.skipped,
        duplicates = summary.duplicates,
        "Dump complete"
    );
}
