//! Focused unit tests covering CLI configuration and command execution.

use super::helpers::{EXTRACTED, SURVEYED, TableFiles};
use super::*;
use crate::compare::{CompareArgs, CompareConfig, execute_compare};
use crate::rank::{RankArgs, RankConfig, execute_rank};
use camino::Utf8PathBuf;
use marathon_core::DirectionSet;
use marathon_data::TableLayout;
use rstest::rstest;

fn rank_config(files: &TableFiles, tables: Vec<Utf8PathBuf>) -> RankConfig {
    RankConfig {
        tables,
        output: files.root().join("reports/Results.csv"),
        layout: TableLayout::Auto,
        directions: DirectionSet::marathon_defaults(),
    }
}

#[rstest]
fn rank_requires_at_least_one_table() {
    let err = RankConfig::try_from(RankArgs::default()).expect_err("no tables should error");
    let message = err.to_string();
    match err {
        CliError::MissingPaths { field, env } => {
            assert_eq!(field, ARG_RANK_TABLES);
            assert_eq!(env, ENV_RANK_TABLES);
        }
        other => panic!("expected MissingPaths, found {other:?}"),
    }
    assert!(!message.contains("--tables"), "message: {message}");
    assert!(message.contains(ENV_RANK_TABLES), "message: {message}");
}

#[rstest]
#[case("--help")]
#[case("--version")]
fn help_and_version_succeed_on_stdout(#[case] flag: &str) {
    let mut stdout = Vec::new();
    run_from(["marathon", flag], &mut stdout).expect("help and version should succeed");
    let rendered = String::from_utf8(stdout).expect("utf-8 output");
    assert!(rendered.contains("marathon"), "output: {rendered}");
}

#[rstest]
fn subcommand_help_succeeds() {
    let mut stdout = Vec::new();
    run_from(["marathon", "rank", "--help"], &mut stdout).expect("rank help should succeed");
    let rendered = String::from_utf8(stdout).expect("utf-8 output");
    assert!(rendered.contains("Usage:"), "output: {rendered}");
}

#[rstest]
fn unknown_flags_are_argument_errors() {
    let mut stdout = Vec::new();
    let err = run_from(["marathon", "--bogus"], &mut stdout).expect_err("unknown flag");
    assert!(matches!(err, CliError::ArgumentParsing(_)), "found {err:?}");
    assert!(stdout.is_empty());
}

#[rstest]
fn failures_are_reported_on_stderr_with_the_program_name() {
    let mut stderr = Vec::new();
    let err = CliError::MissingSourceFile {
        field: ARG_RANK_TABLES,
        path: Utf8PathBuf::from("missing.csv"),
    };
    report_failure(&err, &mut stderr).expect("write report");
    let rendered = String::from_utf8(stderr).expect("utf-8 output");
    assert_eq!(
        rendered,
        "marathon: tables path \"missing.csv\" does not exist\n"
    );
}

#[rstest]
fn rank_defaults_output_layout_and_directions() {
    let args = RankArgs {
        tables: vec![Utf8PathBuf::from("metrics.csv")],
        lower_is_better: vec!["Noise".to_owned()],
        ..RankArgs::default()
    };
    let config = RankConfig::try_from(args).expect("valid args");

    assert_eq!(config.output, Utf8PathBuf::from(DEFAULT_OUTPUT));
    assert_eq!(config.layout, TableLayout::Auto);
    assert!(config.directions.contains("Noise"));
    assert!(config.directions.contains("Elevation Gain"));
}

#[rstest]
fn rank_rejects_unknown_layout() {
    let args = RankArgs {
        tables: vec![Utf8PathBuf::from("metrics.csv")],
        layout: Some("sideways".to_owned()),
        ..RankArgs::default()
    };
    let err = RankConfig::try_from(args).expect_err("layout should be rejected");
    assert!(matches!(err, CliError::InvalidLayout(_)), "got {err:?}");
}

#[rstest]
#[case(None, Some("Current"), Some("Proposed"), ARG_COMPARE_TABLE, ENV_COMPARE_TABLE)]
#[case(Some("t.csv"), None, Some("Proposed"), ARG_COMPARE_BASELINE, ENV_COMPARE_BASELINE)]
#[case(Some("t.csv"), Some("Current"), None, ARG_COMPARE_CANDIDATE, ENV_COMPARE_CANDIDATE)]
fn compare_requires_every_field(
    #[case] table: Option<&str>,
    #[case] baseline: Option<&str>,
    #[case] candidate: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = CompareArgs {
        table: table.map(Utf8PathBuf::from),
        baseline: baseline.map(str::to_owned),
        candidate: candidate.map(str::to_owned),
        ..CompareArgs::default()
    };
    let err = CompareConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn rank_reports_missing_tables() {
    let files = TableFiles::new();
    let config = rank_config(&files, vec![files.root().join("absent.csv")]);
    match execute_rank(&config).expect_err("missing table should fail") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_RANK_TABLES),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn rank_rejects_directories() {
    let files = TableFiles::new();
    let config = rank_config(&files, vec![files.root()]);
    match execute_rank(&config).expect_err("directory should fail") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_RANK_TABLES),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn rank_merges_layouts_and_flips_lower_is_better_metrics() {
    let files = TableFiles::new();
    let extracted = files.write("extracted.csv", EXTRACTED);
    let surveyed = files.write("surveyed.csv", SURVEYED);
    let config = rank_config(&files, vec![extracted, surveyed]);

    let report = execute_rank(&config).expect("rank succeeds");

    let ranked = &report.ranked;
    // Extracted subway counts win over the surveyed placeholders.
    assert_eq!(
        ranked.weighted_rank("Lakeshore", "Number of Subway Stations"),
        Some(1.0)
    );
    assert_eq!(
        ranked.weighted_rank("Lakeshore", "Number of High Traffic Intersections"),
        Some(2.0)
    );
    assert_eq!(
        ranked.weighted_rank("Bloor", "Number of High Traffic Intersections"),
        None
    );
    assert_eq!(ranked.weighted_rank("Lakeshore", "Elevation Gain"), Some(6.0));
    assert_eq!(ranked.best_route(), Some("Lakeshore"));
    assert!(TableFiles::read(&report.output).starts_with("Route,"));
}

#[rstest]
fn rank_reports_malformed_tables() {
    let files = TableFiles::new();
    let ragged = files.write("ragged.csv", "Route,A,B\nR1,1\n");
    let config = rank_config(&files, vec![ragged]);
    match execute_rank(&config).expect_err("ragged table should fail") {
        CliError::Load(marathon_data::LoadError::Malformed { path, .. }) => {
            assert_eq!(path.file_name(), Some("ragged.csv"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!config.output.exists(), "no partial output may be written");
}

#[rstest]
fn compare_reports_percentage_changes() {
    let files = TableFiles::new();
    let table = files.write("extracted.csv", EXTRACTED);
    let config = CompareConfig {
        table,
        baseline: "Lakeshore".to_owned(),
        candidate: "Queen".to_owned(),
        layout: TableLayout::Auto,
    };

    let comparison = execute_compare(&config).expect("compare succeeds");

    let subway = comparison
        .difference("Number of Subway Stations")
        .expect("subway difference");
    assert_eq!(subway.percent_change, 50.0);
    assert_eq!(comparison.differences.len(), 2);
}

#[rstest]
fn compare_rejects_unknown_routes() {
    let files = TableFiles::new();
    let table = files.write("extracted.csv", EXTRACTED);
    let config = CompareConfig {
        table,
        baseline: "Lakeshore".to_owned(),
        candidate: "Spadina".to_owned(),
        layout: TableLayout::Auto,
    };
    match execute_compare(&config).expect_err("unknown route should fail") {
        CliError::Rank(marathon_scorer::RankingError::UnknownRoute { route }) => {
            assert_eq!(route, "Spadina");
        }
        other => panic!("unexpected error {other:?}"),
    }
}
