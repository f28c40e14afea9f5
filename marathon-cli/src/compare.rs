//! `compare` command: percentage differences against a baseline route.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use marathon_data::{TableLayout, read_metric_table};
use marathon_scorer::{BaselineComparison, compare_to_baseline};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::rank::require_existing;
use crate::{
    ARG_COMPARE_BASELINE, ARG_COMPARE_CANDIDATE, ARG_COMPARE_LAYOUT, ARG_COMPARE_TABLE, CliError,
    ENV_COMPARE_BASELINE, ENV_COMPARE_CANDIDATE, ENV_COMPARE_TABLE,
};

/// CLI arguments for the `compare` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "compare",
    long_about = "Report the percentage change of every metric between a \
                 baseline route (typically the current course) and a \
                 candidate route. A zero baseline is replaced by a small \
                 epsilon so the change stays finite. Output is JSON.",
    about = "Compare a candidate route against a baseline"
)]
#[ortho_config(prefix = "MARATHON")]
pub(crate) struct CompareArgs {
    /// Metric table CSV holding both routes.
    #[arg(long = ARG_COMPARE_TABLE, value_name = "path")]
    #[serde(default)]
    pub(crate) table: Option<Utf8PathBuf>,
    /// Route used as the reference point.
    #[arg(long = ARG_COMPARE_BASELINE, value_name = "route")]
    #[serde(default)]
    pub(crate) baseline: Option<String>,
    /// Route compared against the baseline.
    #[arg(long = ARG_COMPARE_CANDIDATE, value_name = "route")]
    #[serde(default)]
    pub(crate) candidate: Option<String>,
    /// Table orientation: auto, routes or metrics.
    #[arg(long = ARG_COMPARE_LAYOUT, value_name = "layout")]
    #[serde(default)]
    pub(crate) layout: Option<String>,
}

impl CompareArgs {
    pub(crate) fn into_config(self) -> Result<CompareConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CompareConfig::try_from(merged)
    }
}

/// Resolved `compare` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompareConfig {
    pub(crate) table: Utf8PathBuf,
    pub(crate) baseline: String,
    pub(crate) candidate: String,
    pub(crate) layout: TableLayout,
}

impl TryFrom<CompareArgs> for CompareConfig {
    type Error = CliError;

    fn try_from(args: CompareArgs) -> Result<Self, Self::Error> {
        let table = args.table.ok_or(CliError::MissingArgument {
            field: ARG_COMPARE_TABLE,
            env: ENV_COMPARE_TABLE,
        })?;
        let baseline = args.baseline.ok_or(CliError::MissingArgument {
            field: ARG_COMPARE_BASELINE,
            env: ENV_COMPARE_BASELINE,
        })?;
        let candidate = args.candidate.ok_or(CliError::MissingArgument {
            field: ARG_COMPARE_CANDIDATE,
            env: ENV_COMPARE_CANDIDATE,
        })?;
        let layout = args
            .layout
            .as_deref()
            .map_or(Ok(TableLayout::Auto), str::parse)?;
        Ok(Self {
            table,
            baseline,
            candidate,
            layout,
        })
    }
}

pub(crate) fn run_compare(args: CompareArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let comparison = execute_compare(&config)?;
    write_comparison(writer, &comparison)
}

pub(crate) fn execute_compare(config: &CompareConfig) -> Result<BaselineComparison, CliError> {
    require_existing(&config.table, ARG_COMPARE_TABLE)?;
    let table = read_metric_table(&config.table, config.layout)?;
    Ok(compare_to_baseline(
        &table,
        &config.baseline,
        &config.candidate,
    )?)
}

fn write_comparison(
    writer: &mut dyn Write,
    comparison: &BaselineComparison,
) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, comparison).map_err(CliError::EncodeReport)?;
    writeln!(writer).map_err(CliError::WriteOutput)
}
