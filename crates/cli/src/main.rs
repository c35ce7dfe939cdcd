//! cvardump CLI binary
//!
//! Entry point for the `cvardump` command-line tool.

mod cli;
mod commands;
mod exit;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use cvardump_core::report_summary;

use crate::cli::Cli;
use crate::exit::{codes, exit_code};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version arrive here too
            return if e.use_stderr() {
                ExitCode::from(codes::INVALID_ARGS as u8)
            } else {
                ExitCode::from(codes::SUCCESS as u8)
            };
        }
    };

    let config = match commands::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(codes::INVALID_ARGS as u8);
        }
    };

    logging::init(cli.verbose, config.debug);
    tracing::debug!("Using config: {:?}", config);

    match commands::execute(cli, &config) {
        Ok(summary) => {
            report_summary(&summary);
            ExitCode::from(codes::SUCCESS as u8)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}
