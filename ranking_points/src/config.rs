// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One completed match between two pairs.
///
/// The scores are signed so that a negative value read from a file can be
/// reported as an input problem instead of failing earlier during parsing.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct MatchResult {
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub score_a: i64,
    pub score_b: i64,
}

impl MatchResult {
    pub fn new(team_a: [&str; 2], team_b: [&str; 2], score_a: i64, score_b: i64) -> MatchResult {
        MatchResult {
            team_a: team_a.iter().map(|s| s.to_string()).collect(),
            team_b: team_b.iter().map(|s| s.to_string()).collect(),
            score_a,
            score_b,
        }
    }
}

/// One line of the award table.
///
/// A band applies to every score difference starting at `min_diff`, up to
/// the `min_diff` of the next band (exclusive).
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RpBand {
    pub min_diff: u64,
    pub winner: u32,
    pub loser: u32,
}

/// The award table, in ascending order of score difference.
///
/// Every pair of awards sums to 1000. The first band is a draw in points.
pub const RP_BANDS: [RpBand; 6] = [
    RpBand {
        min_diff: 0,
        winner: 500,
        loser: 500,
    },
    RpBand {
        min_diff: 100,
        winner: 600,
        loser: 400,
    },
    RpBand {
        min_diff: 300,
        winner: 700,
        loser: 300,
    },
    RpBand {
        min_diff: 500,
        winner: 750,
        loser: 250,
    },
    RpBand {
        min_diff: 700,
        winner: 800,
        loser: 200,
    },
    RpBand {
        min_diff: 1000,
        winner: 900,
        loser: 100,
    },
];

// ******** Output data structures *********

/// A line of the leaderboard. Derived from the full list of results, never stored.
#[derive(PartialEq, Debug, Clone)]
pub struct LeaderboardRow {
    /// 1-based position in the leaderboard.
    pub rank: usize,
    pub participant: String,
    pub total_rp: u64,
    pub matches: u32,
    pub average_rp: f64,
}

/// Which side of a match an input problem was found on.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Side {
    TeamA,
    TeamB,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::TeamA => write!(f, "team A"),
            Side::TeamB => write!(f, "team B"),
        }
    }
}

/// The precise problem behind an invalid input.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum InputIssue {
    /// `match_index` is unknown when a single score pair is checked.
    NegativeScore {
        match_index: Option<usize>,
        score: i64,
    },
    BlankName {
        match_index: usize,
        side: Side,
    },
    TeamSize {
        match_index: usize,
        side: Side,
        size: usize,
    },
    DuplicateInTeam {
        match_index: usize,
        side: Side,
        name: String,
    },
    SharedPlayer {
        match_index: usize,
        name: String,
    },
    UnknownParticipant {
        match_index: usize,
        name: String,
    },
    /// Nobody reached the target score.
    Incomplete {
        score_a: i64,
        score_b: i64,
        target_score: i64,
    },
    MatchIndex {
        match_index: usize,
        len: usize,
    },
}

impl Display for InputIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputIssue::NegativeScore {
                match_index: Some(match_index),
                score,
            } => write!(f, "match {}: negative score {}", match_index, score),
            InputIssue::NegativeScore {
                match_index: None,
                score,
            } => write!(f, "negative score {}", score),
            InputIssue::BlankName { match_index, side } => {
                write!(f, "match {}: {} has a blank participant name", match_index, side)
            }
            InputIssue::TeamSize {
                match_index,
                side,
                size,
            } => write!(
                f,
                "match {}: {} has {} participants instead of 2",
                match_index, side, size
            ),
            InputIssue::DuplicateInTeam {
                match_index,
                side,
                name,
            } => write!(
                f,
                "match {}: {} lists {:?} twice",
                match_index, side, name
            ),
            InputIssue::SharedPlayer { match_index, name } => write!(
                f,
                "match {}: {:?} plays in both teams",
                match_index, name
            ),
            InputIssue::UnknownParticipant { match_index, name } => write!(
                f,
                "match {}: {:?} is not a registered participant",
                match_index, name
            ),
            InputIssue::Incomplete {
                score_a,
                score_b,
                target_score,
            } => write!(
                f,
                "match {}-{} is not complete: one team must reach {} points",
                score_a, score_b, target_score
            ),
            InputIssue::MatchIndex { match_index, len } => write!(
                f,
                "no match at index {} ({} recorded)",
                match_index, len
            ),
        }
    }
}

/// Errors that prevent the computation from completing.
///
/// All of them are problems with the data handed in by the caller. Nothing
/// is retryable.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankingErrors {
    InvalidInput(InputIssue),
}

impl RankingErrors {
    pub fn issue(&self) -> &InputIssue {
        match self {
            RankingErrors::InvalidInput(issue) => issue,
        }
    }
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::InvalidInput(issue) => write!(f, "invalid input: {}", issue),
        }
    }
}

// ********* Configuration **********

/// What to do with a name found in a result that was never registered.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum UnknownParticipantMode {
    /// Fail the computation with an invalid input error.
    Reject,
    /// Add the name to the leaderboard as if it had been registered.
    Register,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RpRules {
    /// A match is only complete once one side reaches this score.
    pub target_score: i64,
    pub unknown_participant_mode: UnknownParticipantMode,
}

impl RpRules {
    pub const DEFAULT_RULES: RpRules = RpRules {
        target_score: 2000,
        unknown_participant_mode: UnknownParticipantMode::Reject,
    };
}

impl Default for RpRules {
    fn default() -> Self {
        RpRules::DEFAULT_RULES
    }
}
