use arranger::cli::{Cli, RunStatus, run_cli};
use arranger::logging::init_logger;
use arranger::output::OutputFormatter;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run_cli(&cli) {
        Ok(RunStatus::Complete) => ExitCode::SUCCESS,
        Ok(RunStatus::PartialFailure) => ExitCode::from(2),
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
