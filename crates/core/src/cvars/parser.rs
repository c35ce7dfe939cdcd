//! `cvarlist` text parser
//!
//! The engine prints one cvar per line in four colon-separated columns:
//!
//! ```text
//! cvar list
//! --------------
//! sv_cheats                  : 0        : , "sv", "rep", "nf" : Allow cheats on server
//! say                        : cmd      :                     : Display player message
//! --------------
//!   2 total convars/concommands
//! ```
//!
//! Parsing is tolerant: a line that is neither a record nor known listing
//! noise is counted as skipped, never fatal.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::record::CvarRecord;

/// name : value : flags : description, with the flags column empty or in
/// the engine's `, "sv"` / `[sv]` form so a value may itself contain `: `
static ENGINE_CVAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s*: (.*)\s*: ((?:,|\[).*?|)\s*:(?: (.*)|)$")
        .expect("engine cvar line pattern is valid")
});

/// name : value : flags : description
static CVAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s*: (.*?)\s*: (.*?)\s*:(?: (.*)|)$").expect("cvar line pattern is valid")
});

/// Trailer the engine prints after the listing
static TOTAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+) total convars/concommands\s*$").expect("total line pattern is valid")
});

/// Banner printed before the listing
const BANNER: &str = "cvar list";

/// Classification of a single line of `cvarlist` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvarLine<'a> {
    /// Empty or whitespace-only
    Blank,
    /// Banner, separator or echoed console prompt
    Noise,
    /// Count reported by the engine's trailer line
    Total(usize),
    /// A cvar or concommand entry
    Record(CvarRecord),
    /// Anything else
    Unparsable(&'a str),
}

/// Classify one line
pub fn classify_line(line: &str) -> CvarLine<'_> {
    let line = line.trim_end();
    let trimmed = line.trim_start();

    if trimmed.is_empty() {
        return CvarLine::Blank;
    }

    if trimmed == BANNER || trimmed.starts_with(']') || trimmed.chars().all(|c| c == '-') {
        return CvarLine::Noise;
    }

    if let Some(captures) = TOTAL_LINE.captures(line) {
        if let Ok(total) = captures[1].parse() {
            return CvarLine::Total(total);
        }
    }

    let Some(captures) = ENGINE_CVAR_LINE
        .captures(line)
        .or_else(|| CVAR_LINE.captures(line))
    else {
        return CvarLine::Unparsable(line);
    };

    let name = captures[1].trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return CvarLine::Unparsable(line);
    }

    CvarLine::Record(CvarRecord {
        name: name.to_string(),
        value: captures[2].trim().to_string(),
        flags: parse_flags(&captures[3]),
        description: parse_description(captures.get(4).map(|m| m.as_str())),
    })
}

/// Split the flags column into tokens
///
/// Accepts the engine's `, "sv", "rep"` form as well as `sv, rep` and
/// `[sv, rep]`.
fn parse_flags(column: &str) -> Vec<String> {
    let column = column.trim();
    let column = column
        .strip_prefix('[')
        .and_then(|c| c.strip_suffix(']'))
        .unwrap_or(column);

    column
        .split(',')
        .map(|token| token.trim().trim_matches('"').trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim the description and strip one pair of surrounding quotes
fn parse_description(raw: Option<&str>) -> String {
    let description = raw.unwrap_or("").trim();
    description
        .strip_prefix('"')
        .and_then(|d| d.strip_suffix('"'))
        .unwrap_or(description)
        .to_string()
}

/// Lazy iterator over classified lines
///
/// Cheap to clone; a clone restarts from the same position.
#[derive(Debug, Clone)]
pub struct CvarLines<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> Iterator for CvarLines<'a> {
    type Item = CvarLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(classify_line)
    }
}

/// Classify every line of a `cvarlist` dump, lazily
pub fn cvar_lines(text: &str) -> CvarLines<'_> {
    CvarLines {
        lines: text.lines(),
    }
}

/// Result of parsing a full dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CvarDump {
    /// Records in server order, first occurrence of each name only
    pub records: Vec<CvarRecord>,
    /// Lines that matched neither a record nor known noise
    pub skipped: usize,
    /// Later occurrences of an already seen name
    pub duplicates: usize,
    /// Count from the `N total convars/concommands` trailer, if present
    pub reported_total: Option<usize>,
}

impl CvarDump {
    /// Parse a complete `cvarlist` dump
    ///
    /// Duplicate names keep their first occurrence.
    pub fn parse(text: &str) -> Self {
        let mut dump = Self::default();
        let mut seen = HashSet::new();

        for line in cvar_lines(text) {
            match line {
                CvarLine::Blank | CvarLine::Noise => {}
                CvarLine::Total(total) => {
                    if let Some(previous) = dump.reported_total {
                        tracing::warn!(
                            "Found a second cvar total ({} after {}), keeping the first",
                            total,
                            previous
                        );
                    } else {
                        dump.reported_total = Some(total);
                    }
                }
                CvarLine::Record(record) => {
                    if seen.insert(record.name.clone()) {
                        dump.records.push(record);
                    } else {
                        tracing::debug!("Ignoring duplicate cvar '{}'", record.name);
                        dump.duplicates += 1;
                    }
                }
                CvarLine::Unparsable(raw) => {
                    tracing::debug!("Skipping unparsable line: {:?}", raw);
                    dump.skipped += 1;
                }
            }
        }

        dump
    }

    /// Number of lines that produced a record, duplicates included
    pub fn parsed_lines(&self) -> usize {
        self.records.len() + self.duplicates
    }

    /// Returns false if the trailer count disagrees with the parsed lines
    pub fn matches_reported_total(&self) -> bool {
        self.reported_total
            .map_or(true, |total| total == self.parsed_lines())
    }
}
