//! Parsed cvar record

/// One cvar as listed by `cvarlist`
///
/// Concommands appear in the same listing with the value `cmd` and are kept
/// as ordinary records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvarRecord {
    /// Cvar name, unique within a dump
    pub name: String,
    /// Current value as printed by the engine
    pub value: String,
    /// Flag tokens in server order (e.g. `sv`, `rep`, `cheat`)
    pub flags: Vec<String>,
    /// Help text, may be empty
    pub description: String,
}

impl CvarRecord {
    /// Create a new record
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        flags: Vec<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            flags,
            description: description.into(),
        }
    }

    /// Returns true if the record carries the given flag token
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Returns true for console commands rather than variables
    pub fn is_command(&self) -> bool {
        self.value == "cmd"
    }
}

impl std::fmt::Display for CvarRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_helpers() {
        let record = CvarRecord::new(
            "sv_cheats",
            "0",
            vec!["sv".to_string(), "cheat".to_string()],
            "Allow cheats",
        );

        assert!(record.has_flag("cheat"));
        assert!(!record.has_flag("rep"));
        assert!(!record.is_command());
        assert_eq!(record.to_string(), "sv_cheats = 0");
    }

    #[test]
    fn test_command_record() {
        let record = CvarRecord::new("say", "cmd", Vec::new(), "Display player message");
        assert!(record.is_command());
    }
}
