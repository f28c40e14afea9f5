//! Behaviour-driven step definitions driving the CLI scenarios.

use super::helpers::{EXTRACTED, SURVEYED, TableFiles};
use super::*;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Scenario state: input files, the invocation outcome and captured stdout.
#[derive(Debug)]
struct CliWorld {
    files: TableFiles,
    tables: RefCell<Vec<Utf8PathBuf>>,
    result: RefCell<Option<Result<(), CliError>>>,
    stdout: RefCell<Vec<u8>>,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            files: TableFiles::new(),
            tables: RefCell::new(Vec::new()),
            result: RefCell::new(None),
            stdout: RefCell::new(Vec::new()),
        }
    }

    fn output(&self) -> Utf8PathBuf {
        self.files.root().join("Results.csv")
    }

    fn invoke(&self, args: &[String]) {
        let invocation = ["marathon".to_owned()].into_iter().chain(args.iter().cloned());
        let outcome = Cli::try_parse_from(invocation)
            .map_err(CliError::ArgumentParsing)
            .and_then(|cli| run_with(cli, &mut *self.stdout.borrow_mut()));
        self.result.replace(Some(outcome));
    }
}

#[fixture]
fn world() -> CliWorld {
    CliWorld::new()
}

#[given("an extracted metrics table")]
fn extracted_table(#[from(world)] world: &CliWorld) {
    let path = world.files.write("extracted.csv", EXTRACTED);
    world.tables.borrow_mut().push(path);
}

#[given("a surveyed elevation table")]
fn surveyed_table(#[from(world)] world: &CliWorld) {
    let path = world.files.write("surveyed.csv", SURVEYED);
    world.tables.borrow_mut().push(path);
}

#[when("I run marathon rank on both tables")]
fn run_rank_command(#[from(world)] world: &CliWorld) {
    let mut args = vec!["rank".to_owned()];
    args.extend(world.tables.borrow().iter().map(ToString::to_string));
    args.extend([format!("--{ARG_RANK_OUTPUT}"), world.output().to_string()]);
    world.invoke(&args);
}

#[when("I run marathon rank without tables")]
fn run_rank_without_tables(#[from(world)] world: &CliWorld) {
    world.invoke(&["rank".to_owned()]);
}

#[when("I run marathon compare for Queen against Lakeshore")]
fn run_compare_command(#[from(world)] world: &CliWorld) {
    let table = world
        .tables
        .borrow()
        .first()
        .cloned()
        .expect("table recorded");
    world.invoke(&[
        "compare".to_owned(),
        format!("--{ARG_COMPARE_TABLE}"),
        table.to_string(),
        format!("--{ARG_COMPARE_BASELINE}"),
        "Lakeshore".to_owned(),
        format!("--{ARG_COMPARE_CANDIDATE}"),
        "Queen".to_owned(),
    ]);
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &CliWorld) {
    match world.result.borrow().as_ref() {
        Some(Ok(())) => {}
        Some(Err(err)) => panic!("command failed: {err}"),
        None => panic!("command was not run"),
    }
}

#[then("the results file starts with the weighted rank header")]
fn results_header(#[from(world)] world: &CliWorld) {
    let contents = TableFiles::read(&world.output());
    let header = contents.lines().next().expect("header line");
    assert_eq!(
        header,
        "Route,Number of Subway Stations Weighted Rank,\
         Number of High Traffic Intersections Weighted Rank,\
         Elevation Gain Weighted Rank,Overall Weighted Score"
    );
    assert_eq!(contents.lines().count(), 4);
}

#[then("the CLI reports that the \"tables\" argument is missing")]
fn reports_missing_tables(#[from(world)] world: &CliWorld) {
    match world.result.borrow().as_ref() {
        Some(Err(CliError::MissingPaths { field, .. })) => assert_eq!(*field, ARG_RANK_TABLES),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[then("the JSON report lists a 50 percent subway increase")]
fn json_report(#[from(world)] world: &CliWorld) {
    let report: serde_json::Value =
        serde_json::from_slice(&world.stdout.borrow()).expect("JSON report");
    assert_eq!(
        report.pointer("/candidate"),
        Some(&serde_json::json!("Queen"))
    );
    assert_eq!(
        report.pointer("/differences/0/metric"),
        Some(&serde_json::json!("Number of Subway Stations"))
    );
    assert_eq!(
        report.pointer("/differences/0/percent_change"),
        Some(&serde_json::json!(50.0))
    );
}

macro_rules! register_cli_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/cli.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CliWorld) {
            let _ = world;
        }
    };
}

register_cli_scenario!(ranking_tables, "Ranking extracted and surveyed tables");
register_cli_scenario!(ranking_without_tables, "Ranking without any table");
register_cli_scenario!(comparing_routes, "Comparing a candidate with the current course");
