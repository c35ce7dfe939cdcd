//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Dumps a list of cvars from a Source engine server into a CSV spreadsheet
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "cvardump")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output CSV path, stdout when omitted
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Config file, cvardump.toml next to the binary when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace), RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Connect to a server over RCON and run "cvarlist"
    Rcon(RconArgs),
    /// Read the output of "cvarlist" from a file, e.g. one captured on a client
    Manual(ManualArgs),
}

/// Arguments for the rcon command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct RconArgs {
    /// Server address and port, ex: 192.168.1.100:27015
    pub host: String,

    /// RCON password
    pub password: String,

    /// TCP connect timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub connect_timeout: Option<u64>,

    /// Overall timeout for connect, authenticate and command in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,
}

/// Arguments for the manual command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct ManualArgs {
    /// Input file, stdin when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input file, as a positional argument
    #[arg(conflicts_with = "input", value_name = "FILE")]
    pub path: Option<PathBuf>,
}

impl ManualArgs {
    /// Input path from either form, None for stdin
    pub fn input_path(&self) -> Option<PathBuf> {
        self.input.clone().or_else(|| self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rcon() {
        let cli = Cli::try_parse_from([
            "cvardump",
            "rcon",
            "--output=cvars.csv",
            "10.0.0.5:27015",
            "hunter2",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(PathBuf::from("cvars.csv")));
        let Command::Rcon(args) = cli.command else {
            panic!("expected rcon");
        };
        assert_eq!(args.host, "10.0.0.5:27015");
        assert_eq!(args.password, "hunter2");
        assert_eq!(args.timeout, None);
    }

    #[test]
    fn test_parse_rcon_requires_password() {
        assert!(Cli::try_parse_from(["cvardump", "rcon", "10.0.0.5:27015"]).is_err());
    }

    #[test]
    fn test_parse_rcon_timeouts() {
        let cli = Cli::try_parse_from([
            "cvardump",
            "rcon",
            "--connect-timeout",
            "250",
            "--timeout",
            "2000",
            "host:1",
            "pw",
        ])
        .unwrap();

        let Command::Rcon(args) = cli.command else {
            panic!("expected rcon");
        };
        assert_eq!(args.connect_timeout, Some(250));
        assert_eq!(args.timeout, Some(2000));
    }

    #[test]
    fn test_parse_manual_flag() {
        let cli = Cli::try_parse_from([
            "cvardump",
            "manual",
            "--input=dump.txt",
            "--output=cvars.csv",
        ])
        .unwrap();

        let Command::Manual(args) = cli.command else {
            panic!("expected manual");
        };
        assert_eq!(args.input_path(), Some(PathBuf::from("dump.txt")));
        assert_eq!(cli.output, Some(PathBuf::from("cvars.csv")));
    }

    #[test]
    fn test_parse_manual_positional_and_stdin() {
        let cli = Cli::try_parse_from(["cvardump", "manual", "dump.txt"]).unwrap();
        let Command::Manual(args) = cli.command else {
            panic!("expected manual");
        };
        assert_eq!(args.input_path(), Some(PathBuf::from("dump.txt")));

        let cli = Cli::try_parse_from(["cvardump", "-v", "manual"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Manual(args) = cli.command else {
            panic!("expected manual");
        };
        assert_eq!(args.input_path(), None);
    }

    #[test]
    fn test_parse_manual_conflicting_inputs() {
        assert!(Cli::try_parse_from(["cvardump", "manual", "--input", "a.txt", "b.txt"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["cvardump"]).is_err());
    }
}
