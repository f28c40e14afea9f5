//! Command-line interface for ranking candidate marathon routes.
//!
//! `marathon rank` loads one or more metric tables, ranks every route and
//! writes the weighted ranks with an overall score. `marathon compare`
//! reports how a candidate route differs from a baseline route.
#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::io::Write;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

mod compare;
mod error;
mod rank;

pub use error::CliError;

use compare::{CompareArgs, run_compare};
use rank::{RankArgs, run_rank};

const ARG_RANK_TABLES: &str = "tables";
const ARG_RANK_OUTPUT: &str = "output";
const ARG_RANK_LAYOUT: &str = "layout";
const ARG_RANK_LOWER_IS_BETTER: &str = "lower-is-better";
const ENV_RANK_TABLES: &str = "MARATHON_CMDS_RANK_TABLES";
const ARG_COMPARE_TABLE: &str = "table";
const ARG_COMPARE_BASELINE: &str = "baseline";
const ARG_COMPARE_CANDIDATE: &str = "candidate";
const ARG_COMPARE_LAYOUT: &str = "layout";
const ENV_COMPARE_TABLE: &str = "MARATHON_CMDS_COMPARE_TABLE";
const ENV_COMPARE_BASELINE: &str = "MARATHON_CMDS_COMPARE_BASELINE";
const ENV_COMPARE_CANDIDATE: &str = "MARATHON_CMDS_COMPARE_CANDIDATE";

/// Default results file, matching the report name used by the route study.
const DEFAULT_OUTPUT: &str = "Results.csv";

/// Install a stderr log formatter filtered by `RUST_LOG` (default `info`).
///
/// Records emitted through the `log` facade by the library crates are
/// forwarded to the same formatter.
///
/// # Errors
/// Returns [`CliError::Logging`] when a global subscriber is already set.
pub fn init_logging() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()?;
    Ok(())
}

/// Run the marathon CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid or the command fails.
pub fn run() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_from(std::env::args_os(), &mut stdout)
}

/// Parse `args` and run the selected command, writing reports to `stdout`.
///
/// Help and version requests are rendered to `stdout` and succeed.
///
/// # Errors
/// Returns [`CliError`] when arguments are invalid or the command fails.
pub fn run_from<I, T>(args: I, stdout: &mut dyn Write) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            return write!(stdout, "{}", err.render()).map_err(CliError::WriteOutput);
        }
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    run_with(cli, stdout)
}

/// Write a fatal error to `stderr` as `marathon: <message>`.
///
/// The message bypasses the log filter so a failing run is always explained,
/// even when logging could not be installed or `RUST_LOG` silences it.
///
/// # Errors
/// Returns the I/O error raised while writing.
pub fn report_failure(err: &CliError, stderr: &mut dyn Write) -> std::io::Result<()> {
    writeln!(stderr, "marathon: {err}")
}

fn run_with(cli: Cli, stdout: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::Rank(args) => run_rank(args).map(|_| ()),
        Command::Compare(args) => run_compare(args, stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "marathon",
    about = "Rank candidate marathon routes by weighted metric ranks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank routes from one or more metric tables and write the results.
    Rank(RankArgs),
    /// Compare a candidate route against a baseline route.
    Compare(CompareArgs),
}

#[cfg(test)]
mod tests;
