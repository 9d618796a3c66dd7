//! `edi837` binary.

use chrono::Local;
use clap::Parser;
use edi837_cli::cli::{Cli, Command};
use edi837_cli::commands::{CheckOutcome, run_check, run_convert, validation_issues};
use edi837_cli::logging::init_logging;
use edi837_cli::summary::{print_conversion, print_issues, print_valid_claim};

/// Exit code for a claim that parsed but failed validation in `check`.
const EXIT_INVALID: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Convert(args) => match run_convert(args, Local::now().naive_local()) {
            Ok(outcome) => {
                print_conversion(&outcome);
                0
            }
            Err(error) => {
                report(&error);
                1
            }
        },
        Command::Check(args) => match run_check(args) {
            Ok(CheckOutcome::Valid(model)) => {
                print_valid_claim(&model);
                0
            }
            Ok(CheckOutcome::Invalid(issues)) => {
                print_issues(&issues);
                EXIT_INVALID
            }
            Err(error) => {
                report(&error);
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn report(error: &anyhow::Error) {
    match validation_issues(error) {
        Some(issues) => {
            eprintln!("error: {error}");
            print_issues(issues);
        }
        None => eprintln!("error: {error:#}"),
    }
}
