//! Binary entrypoint for the `codetree` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    codetree::logging::init_logging();
    // Recording is handled in commands::dispatch via CODETREE_RECORD=<file>.
    match codetree::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
