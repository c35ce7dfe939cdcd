//! Cvar listing - turn `cvarlist` output into records
//!
//! The parser only sees assembled text, so a dump fetched over RCON and a
//! dump captured to a file go through the same path.
//!
//! # Example
//!
//! ```
//! use cvardump_core::cvars::CvarDump;
//!
//! let dump = CvarDump::parse("sv_cheats : 0 : sv, cheat : \"Allow cheats\"\n");
//! assert_eq!(dump.records[0].name, "sv_cheats");
//! assert_eq!(dump.records[0].flags, ["sv", "cheat"]);
//! assert_eq!(dump.skipped, 0);
//! ```

mod parser;
mod record;

pub use parser::{classify_line, cvar_lines, CvarDump, CvarLine, CvarLines};
pub use record::CvarRecord;
