//! `rank` command: load, merge, rank and write.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{info, warn};
use marathon_core::{DirectionSet, RankedTable};
use marathon_data::{TableLayout, read_metric_tables, write_ranked_file};
use marathon_scorer::rank_routes;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_RANK_LAYOUT, ARG_RANK_LOWER_IS_BETTER, ARG_RANK_OUTPUT, ARG_RANK_TABLES, CliError,
    DEFAULT_OUTPUT, ENV_RANK_TABLES,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "rank",
    long_about = "Load one or more route by metric tables, merge them with \
                 earlier tables taking priority, and rank every route. \
                 Metrics where less is better (traffic intersections, \
                 condominiums, turn sharpness, elevation gain) are flipped \
                 before ranking.",
    about = "Rank routes from metric tables"
)]
#[ortho_config(prefix = "MARATHON")]
pub(crate) struct RankArgs {
    /// Metric table CSV files, highest priority first.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) tables: Vec<Utf8PathBuf>,
    /// Destination for the ranked results CSV.
    #[arg(long = ARG_RANK_OUTPUT, short = 'o', value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Table orientation: auto, routes or metrics.
    #[arg(long = ARG_RANK_LAYOUT, value_name = "layout")]
    #[serde(default)]
    pub(crate) layout: Option<String>,
    /// Additional metric where a lower value is better; repeatable.
    #[arg(long = ARG_RANK_LOWER_IS_BETTER, value_name = "metric")]
    #[serde(default)]
    pub(crate) lower_is_better: Vec<String>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankConfig {
    /// Tables to merge, in priority order.
    pub(crate) tables: Vec<Utf8PathBuf>,
    /// Results CSV destination.
    pub(crate) output: Utf8PathBuf,
    /// Orientation used to parse every table.
    pub(crate) layout: TableLayout,
    /// Metrics negated before ranking.
    pub(crate) directions: DirectionSet,
}

impl RankConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        self.tables
            .iter()
            .try_for_each(|table| require_existing(table, ARG_RANK_TABLES))
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        if args.tables.is_empty() {
            return Err(CliError::MissingPaths {
                field: ARG_RANK_TABLES,
                env: ENV_RANK_TABLES,
            });
        }
        let layout = args
            .layout
            .as_deref()
            .map_or(Ok(TableLayout::Auto), str::parse)?;
        let mut directions = DirectionSet::marathon_defaults();
        directions.extend(args.lower_is_better);
        Ok(Self {
            tables: args.tables,
            output: args
                .output
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT)),
            layout,
            directions,
        })
    }
}

/// Outcome of a successful `rank` run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankReport {
    /// Where the results were written.
    pub(crate) output: Utf8PathBuf,
    /// The ranked table that was written.
    pub(crate) ranked: RankedTable,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<RankReport, CliError> {
    let config = args.into_config()?;
    execute_rank(&config)
}

pub(crate) fn execute_rank(config: &RankConfig) -> Result<RankReport, CliError> {
    config.validate_sources()?;
    let merged = read_metric_tables(&config.tables, config.layout)?;
    let ranked = rank_routes(&merged, &config.directions)?;
    write_ranked_file(&config.output, &ranked)?;
    match ranked.best_route() {
        Some(best) => info!("best route: {best}"),
        None => warn!("no route had enough data to be scored"),
    }
    Ok(RankReport {
        output: config.output.clone(),
        ranked,
    })
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match marathon_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.is_dir() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}
