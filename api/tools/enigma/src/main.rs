// Copyright (C) Microsoft Corporation. All rights reserved.

mod cli;
mod commands;
mod error;
mod logger;
mod response;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use enigma_ddi::EnigmaDdi;

use crate::cli::*;
use crate::error::CliError;
use crate::response::Response;

/// First line of a clap error, without the `error: ` prefix.
fn usage_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

fn main() -> ExitCode {
    let cli_args = match CliArgs::try_parse() {
        Ok(cli_args) => cli_args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let response = Response::from(&CliError::Usage(usage_message(&err)));
            println!("{}", response.to_json());
            return ExitCode::FAILURE;
        }
    };

    logger::init(cli_args.verbose);
    tracing::debug!(library = ?cli_args.command.library(), "Starting");

    let ddi = EnigmaDdi::default();
    let response = commands::run(&ddi, &cli_args);
    println!("{}", response.to_json());

    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
