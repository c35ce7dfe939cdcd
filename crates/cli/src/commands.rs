//! Subcommand execution

use cvardump_core::export::ExportDestination;
use cvardump_core::{
    run_manual, run_rcon, ConfigError, ConfigResult, CvardumpConfig, DumpError, DumpSummary,
};
use thiserror::Error;

use crate::cli::{Cli, Command};

/// Errors from running a subcommand
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Dump(#[from] DumpError),
}

/// Load the config file and apply command-line overrides
pub fn load_config(cli: &Cli) -> ConfigResult<CvardumpConfig> {
    let mut config = CvardumpConfig::load(cli.config.as_deref())?;

    if let Command::Rcon(args) = &cli.command {
        if let Some(ms) = args.connect_timeout {
            config.connect_timeout_ms = ms;
        }
        if let Some(ms) = args.timeout {
            config.operation_timeout_ms = ms;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Run the selected subcommand
pub fn execute(cli: Cli, config: &CvardumpConfig) -> Result<DumpSummary, CommandError> {
    let destination = ExportDestination::from_option(cli.output);

    let summary = match cli.command {
        Command::Rcon(args) => run_rcon(&args.host, &args.password, &destination, config)?,
        Command::Manual(args) => run_manual(args.input_path(), &destination)?,
    };

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_timeout_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("cvardump.toml");
        std::fs::write(&config_path, "operation_timeout_ms = 9000\n").unwrap();

        let cli = Cli::try_parse_from([
            "cvardump",
            "rcon",
            "--config",
            config_path.to_str().unwrap(),
            "--connect-timeout",
            "100",
            "host:1",
            "pw",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.connect_timeout_ms, 100);
        assert_eq!(config.operation_timeout_ms, 9000);
    }

    #[test]
    fn test_zero_timeout_override_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("cvardump.toml");
        std::fs::write(&config_path, "").unwrap();

        let cli = Cli::try_parse_from([
            "cvardump",
            "rcon",
            "--config",
            config_path.to_str().unwrap(),
            "--timeout",
            "0",
            "host:1",
            "pw",
        ])
        .unwrap();

        assert!(matches!(load_config(&cli), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_execute_manual_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        let output = dir.path().join("cvars.csv");
        std::fs::write(&input, "").unwrap();

        let cli = Cli::try_parse_from([
            "cvardump",
            "manual",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();

        let summary = execute(cli, &CvardumpConfig::default()).unwrap();
        assert_eq!(summary.records, 0);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "name,value,flags,description\n"
        );
    }
}
