use log::{debug, info, warn};

use ranking_points::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::rp::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum RpError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name:?} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Row {lineno}: could not understand cell {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Column {column:?} not found in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        lineno: usize,
        path: String,
    },
    #[snafu(display("Error writing {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error parsing a number in the configuration"))]
    ParsingJsonNumber {},
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(display("Rejected result {id}"))]
    InvalidResult { source: RankingErrors, id: String },
    #[snafu(display("Could not compute the leaderboard"))]
    Leaderboard { source: RankingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RpResult<T> = Result<T, RpError>;

/// A result as read from an input file, with a label pointing back to its origin.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedResult {
    pub id: String,
    pub result: MatchResult,
}

/// Where the outputs of a run go. Nothing is written for the fields left empty.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Outputs {
    /// File path or `stdout` for the JSON summary.
    pub summary: Option<String>,
    pub csv: Option<String>,
    /// Reference JSON summary to compare against.
    pub reference: Option<String>,
}

fn leaderboard_to_json(rows: &[LeaderboardRow]) -> Vec<JSValue> {
    rows.iter()
        .map(|r| {
            json!({
                "rank": r.rank.to_string(),
                "participant": r.participant,
                "totalRp": r.total_rp.to_string(),
                "matches": r.matches.to_string(),
                "averageRp": format!("{:.2}", r.average_rp),
            })
        })
        .collect()
}

fn build_summary_js(config: &RpConfig, rules: &RpRules, rows: &[LeaderboardRow]) -> JSValue {
    let c = OutputConfig {
        tournament: config.output_settings.tournament_name.clone(),
        date: config.output_settings.tournament_date.clone(),
        target_score: rules.target_score.to_string(),
    };
    json!({
        "config": c,
        "results": leaderboard_to_json(rows) })
}

fn print_leaderboard(title: &str, rows: &[LeaderboardRow]) {
    println!("{}", title);
    println!(
        "|{0:>4} | {1:20} | {2:>8} | {3:>7} | {4:>10} |",
        "Rank", "Participant", "Total RP", "Matches", "Average RP"
    );
    for r in rows {
        println!(
            "|{0:3}. | {1:20} | {2:8} | {3:7} | {4:10.2} |",
            r.rank, r.participant, r.total_rp, r.matches, r.average_rp
        );
    }
}

fn print_results(parsed: &[ParsedResult]) {
    println!("Matches");
    for pr in parsed {
        let r = &pr.result;
        println!(
            "| {0:30} | {1:30} | {2:5} - {3:<5} | {4:30} |",
            r.team_a.join(" & "),
            r.team_b.join(" & "),
            r.score_a,
            r.score_b,
            pr.id
        );
    }
}

fn source_path(root: &Path, cfs: &FileSource) -> String {
    let p: PathBuf = root.join(&cfs.file_path);
    p.as_path().display().to_string()
}

fn read_participants(root: &Path, cfs: &FileSource) -> RpResult<Vec<String>> {
    let p = source_path(root, cfs);
    info!("Attempting to read participant file {:?}", p);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_participants(&p),
        "xlsx" => io_xlsx::read_xlsx_participants(&p, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn read_results(root: &Path, cfs: &FileSource) -> RpResult<Vec<ParsedResult>> {
    let p = source_path(root, cfs);
    info!("Attempting to read result file {:?}", p);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_results(&p),
        "xlsx" => io_xlsx::read_xlsx_results(&p, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

// Points an engine error back to the input line that caused it, when possible.
fn locate_error(e: RankingErrors, parsed: &[ParsedResult]) -> RpError {
    let match_index = match e.issue() {
        InputIssue::BlankName { match_index, .. }
        | InputIssue::TeamSize { match_index, .. }
        | InputIssue::DuplicateInTeam { match_index, .. }
        | InputIssue::SharedPlayer { match_index, .. }
        | InputIssue::UnknownParticipant { match_index, .. } => Some(*match_index),
        InputIssue::NegativeScore { match_index, .. } => *match_index,
        _ => None,
    };
    match match_index.and_then(|idx| parsed.get(idx)) {
        Some(pr) => RpError::InvalidResult {
            source: e,
            id: pr.id.clone(),
        },
        None => RpError::Leaderboard { source: e },
    }
}

/// Computes the leaderboard of a tournament and writes the requested outputs.
///
/// The file paths of the configuration are resolved against `root`.
pub fn run_tournament(
    config: &RpConfig,
    root: &Path,
    rules: &RpRules,
    outputs: &Outputs,
) -> RpResult<Vec<LeaderboardRow>> {
    info!("config: {:?}", config);

    let mut names: Vec<String> = config.participants.clone();
    for cfs in config.participant_sources.iter() {
        let mut file_names = read_participants(root, cfs)?;
        names.append(&mut file_names);
    }
    let participants = io_common::dedup_names(names);
    info!("{} participants registered", participants.len());

    let mut parsed: Vec<ParsedResult> = Vec::new();
    for cfs in config.result_sources.iter() {
        let mut file_data = read_results(root, cfs)?;
        parsed.append(&mut file_data);
    }
    info!("{} results read", parsed.len());

    // Acceptance checks done before handing the results over.
    for (idx, pr) in parsed.iter().enumerate() {
        validate_result(&pr.result, idx, rules).context(InvalidResultSnafu {
            id: pr.id.clone(),
        })?;
    }

    let results: Vec<MatchResult> = parsed.iter().map(|pr| pr.result.clone()).collect();
    let rows = match leaderboard_with_rules(&participants, &results, rules) {
        Ok(rows) => rows,
        Err(e) => return Err(locate_error(e, &parsed)),
    };

    print_results(&parsed);
    print_leaderboard(&config.output_settings.tournament_name, &rows);

    let result_js = build_summary_js(config, rules, &rows);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let summary_path: Option<String> = match (&outputs.summary, &config.output_settings.output_directory) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(dir)) => Some(
            root.join(dir)
                .join("summary.json")
                .as_path()
                .display()
                .to_string(),
        ),
        (None, None) => None,
    };
    match summary_path.as_deref() {
        Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some(p) => {
            info!("Writing summary to {:?}", p);
            fs::write(p, &pretty_js_stats).context(WritingFileSnafu { path: p })?;
        }
        None => {
            debug!("run_tournament: no summary output requested");
        }
    }

    if let Some(p) = &outputs.csv {
        info!("Writing leaderboard to {:?}", p);
        io_csv::write_csv_leaderboard(p, &rows)?;
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &outputs.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(rows)
}

/// Reads a configuration file. Returns it with the directory its paths are relative to.
pub fn load_config(config_path: &str) -> RpResult<(RpConfig, PathBuf)> {
    let config = read_config(config_path)?;
    let root = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?
        .to_path_buf();
    Ok((config, root))
}

fn config_from_args(args: &Args) -> RpResult<RpConfig> {
    let provider = args.input_type.clone().unwrap_or_else(|| "csv".to_string());
    let source = |path: &String| FileSource {
        provider: provider.clone(),
        file_path: path.clone(),
        excel_worksheet_name: args.excel_worksheet_name.clone(),
    };
    let results = match &args.results {
        Some(p) => source(p),
        None => whatever!("No result file provided: use --results or --config"),
    };
    let participant_sources: Vec<FileSource> = args.participants.iter().map(source).collect();
    if participant_sources.is_empty() && !args.register_unknown {
        warn!("No participant file provided: every result will name an unknown participant");
    }
    Ok(RpConfig {
        output_settings: OutputSettings {
            tournament_name: "Leaderboard".to_string(),
            tournament_date: None,
            output_directory: None,
        },
        participants: vec![],
        participant_sources,
        result_sources: vec![results],
        rules: RulesSettings::default(),
    })
}

pub fn run_with_args(args: &Args) -> RpResult<()> {
    let (config, root) = match &args.config {
        Some(config_path) => load_config(config_path)?,
        None => (config_from_args(args)?, PathBuf::new()),
    };

    // The flags take precedence over the configuration, with the same checks.
    let mut settings = config.rules.clone();
    if let Some(target_score) = args.target_score {
        settings.target_score = Some(JSValue::from(target_score));
    }
    if args.register_unknown {
        settings.unknown_participant = Some("register".to_string());
    }
    let rules = settings.to_rules()?;

    let outputs = Outputs {
        summary: args.out.clone(),
        csv: args.csv_out.clone(),
        reference: args.reference.clone(),
    };
    run_tournament(&config, &root, &rules, &outputs)?;
    Ok(())
}

fn test_dir() -> &'static str {
    option_env!("RP_TEST_DIR").unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"))
}

/// Runs the fixture `<test_name>/<test_name>_config.json` and checks it against
/// `<test_name>/<test_name>_expected_summary.json`.
pub fn test_wrapper(test_name: &str) -> RpResult<Vec<LeaderboardRow>> {
    info!("Running test {}", test_name);
    let config_path = format!("{}/{}/{}_config.json", test_dir(), test_name, test_name);
    let (config, root) = load_config(&config_path)?;
    let rules = config.rules.to_rules()?;
    let outputs = Outputs {
        reference: Some(format!(
            "{}/{}/{}_expected_summary.json",
            test_dir(),
            test_name,
            test_name
        )),
        ..Outputs::default()
    };
    run_tournament(&config, &root, &rules, &outputs)
}
