use std::collections::HashSet;
use std::path::Path;

use crate::rp::*;

pub const PARTICIPANT_COLUMN: &str = "Participant";
pub const RESULT_COLUMNS: [&str; 6] = ["a1", "a2", "b1", "b2", "score_a", "score_b"];

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Keeps the first occurrence of every name, in order. Blank names are dropped.
pub fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        if seen.insert(name.clone()) {
            res.push(name);
        } else {
            debug!("dedup_names: {:?} is already registered", name);
        }
    }
    res
}

/// Assembles a result from the six columns of a result row.
///
/// Missing players are left out, the engine reports the short team.
pub fn assemble_result(players: [Option<String>; 4], score_a: i64, score_b: i64) -> MatchResult {
    let [a1, a2, b1, b2] = players;
    MatchResult {
        team_a: [a1, a2].into_iter().flatten().collect(),
        team_b: [b1, b2].into_iter().flatten().collect(),
        score_a,
        score_b,
    }
}
