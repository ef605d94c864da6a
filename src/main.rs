//! propbind - Bind data sources to typed component props and slots

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = propbind::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
