//! automl: command line client for the AutoML service.

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use automl_cli::{Cli, Surfaced};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match automl_cli::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Surfaced>() {
                // the error policy already printed it
                Some(surfaced) if surfaced.printed => {},
                Some(surfaced) => eprintln!("{} {}", "error:".red().bold(), surfaced.error),
                None => eprintln!("{} {err:#}", "error:".red().bold()),
            }
            ExitCode::FAILURE
        },
    }
}
