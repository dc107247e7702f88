//! bucketview - command-line inspector for a bucketed key-value store

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = bucketview::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
