use jarfetch_core::logging;
use jarfetch_core::run::exit_code;
use std::io::Write;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; carry on without it if that fails.
    if let Err(err) = logging::init_logging() {
        eprintln!("{:#}", err);
    }

    let result = Cli::run_from_args();
    if let Err(err) = &result {
        eprintln!("jarfetch error: {:#}", err);
    }

    // Make sure every log line is out before exiting.
    let _ = std::io::stderr().flush();
    std::process::exit(exit_code(&result));
}
