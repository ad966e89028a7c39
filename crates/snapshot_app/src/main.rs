mod boundary;
mod cli;

use std::process::ExitCode;

use clap::Parser;
use snapshot_logging::{snap_error, LogDestination};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();
    snapshot_logging::initialize(LogDestination::Terminal, args.log_level());
    boundary::install_panic_hook();

    match cli::run(args).await {
        Ok(outcome) => ExitCode::from(boundary::exit_status(&outcome)),
        Err(err) => {
            snap_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
