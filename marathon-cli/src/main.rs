//! Entry point for the `marathon` command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    match marathon_cli::init_logging().and_then(|()| marathon_cli::run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Nothing more can be reported when stderr itself is unwritable.
            marathon_cli::report_failure(&err, &mut std::io::stderr().lock()).ok();
            ExitCode::FAILURE
        }
    }
}
