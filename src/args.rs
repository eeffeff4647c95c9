use clap::Parser;

/// This is a scorekeeping program for pairs card tournaments.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the tournament description in JSON format.
    /// When provided, the participant and result files are read from the sources it lists.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the summary of a tournament in JSON format. If provided,
    /// rptally will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the tournament will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the leaderboard will be written in CSV format to the given location.
    #[clap(long, value_parser)]
    pub csv_out: Option<String>,

    /// (file path) The file with the registered participants. Ignored when --config is used.
    #[clap(short, long, value_parser)]
    pub participants: Option<String>,

    /// (file path) The file with the match results. Ignored when --config is used.
    #[clap(short = 'i', long, value_parser)]
    pub results: Option<String>,

    /// (default csv) The type of the input files: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using Excel files, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 2000) The score one of the pairs must reach for a match to be complete.
    #[clap(long, value_parser)]
    pub target_score: Option<i64>,

    /// If passed as an argument, participants found in the results but not registered
    /// are added to the leaderboard instead of causing an error.
    #[clap(long, takes_value = false)]
    pub register_unknown: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
