/*!
Ranking points for pairs card tournaments.

Every match is played between two pairs until one side reaches the target
score. The score difference is converted into a pair of ranking points (RP)
through a fixed table (see [`RP_BANDS`]) and the leaderboard ranks every
participant by average RP per match played.

```
use ranking_points::*;

let participants: Vec<String> = ["P1", "P2", "P3", "P4"].iter().map(|s| s.to_string()).collect();
let results = vec![MatchResult::new(["P1", "P2"], ["P3", "P4"], 2500, 2000)];

let rows = leaderboard(&participants, &results)?;
assert_eq!(rows[0].participant, "P1");
assert_eq!(rows[0].total_rp, 750);
assert_eq!(rows[3].average_rp, 250.0);
# Ok::<(), RankingErrors>(())
```

The computation is stateless: the leaderboard is rebuilt from the complete
list of results on every call.
*/
pub mod builder;
mod config;
pub mod manual;

use log::{debug, info, warn};

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

pub use crate::config::*;

// **** Private structures ****

// Running totals for one participant.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct Tally {
    total_rp: u64,
    matches: u32,
}

impl Tally {
    const EMPTY: Tally = Tally {
        total_rp: 0,
        matches: 0,
    };

    fn record(&mut self, rp: u32) {
        self.total_rp += rp as u64;
        self.matches += 1;
    }

    fn average(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.total_rp as f64 / self.matches as f64
        }
    }

    // Compares total_rp / matches without going through floats.
    // A participant without matches has a total of zero, so 0 / 1 is used.
    fn cmp_average(&self, other: &Tally) -> Ordering {
        let lhs = self.total_rp as u128 * other.matches.max(1) as u128;
        let rhs = other.total_rp as u128 * self.matches.max(1) as u128;
        lhs.cmp(&rhs)
    }
}

fn invalid(issue: InputIssue) -> RankingErrors {
    RankingErrors::InvalidInput(issue)
}

fn find_band(diff: u64) -> &'static RpBand {
    RP_BANDS
        .iter()
        .rev()
        .find(|band| diff >= band.min_diff)
        .unwrap_or(&RP_BANDS[0])
}

/// Converts the final scores of one match into the ranking points of each team.
///
/// Returns `(rp_a, rp_b)`. The two values always sum to 1000. When the scores
/// are less than 100 points apart, both teams get 500 whoever won.
///
/// ```
/// use ranking_points::award;
///
/// assert_eq!(award(2100, 2000)?, (600, 400));
/// assert_eq!(award(2000, 2100)?, (400, 600));
/// assert_eq!(award(2050, 2000)?, (500, 500));
/// # Ok::<(), ranking_points::RankingErrors>(())
/// ```
pub fn award(score_a: i64, score_b: i64) -> Result<(u32, u32), RankingErrors> {
    for score in [score_a, score_b] {
        if score < 0 {
            return Err(invalid(InputIssue::NegativeScore {
                match_index: None,
                score,
            }));
        }
    }
    let diff = score_a.abs_diff(score_b);
    let band = find_band(diff);
    // Equal scores can only land in the first band, where both awards are the same.
    let res = if score_a >= score_b {
        (band.winner, band.loser)
    } else {
        (band.loser, band.winner)
    };
    debug!(
        "award: {} - {} (diff {}) -> {:?}",
        score_a, score_b, diff, res
    );
    debug_assert_eq!(res.0 + res.1, 1000);
    Ok(res)
}

fn check_team(team: &[String], side: Side, match_index: usize) -> Result<(), RankingErrors> {
    if team.iter().any(|name| name.trim().is_empty()) {
        return Err(invalid(InputIssue::BlankName { match_index, side }));
    }
    match team {
        [first, second] if first == second => Err(invalid(InputIssue::DuplicateInTeam {
            match_index,
            side,
            name: first.clone(),
        })),
        [_, _] => Ok(()),
        _ => Err(invalid(InputIssue::TeamSize {
            match_index,
            side,
            size: team.len(),
        })),
    }
}

// Both teams have two distinct members and nobody plays on both sides.
fn check_composition(result: &MatchResult, match_index: usize) -> Result<(), RankingErrors> {
    check_team(&result.team_a, Side::TeamA, match_index)?;
    check_team(&result.team_b, Side::TeamB, match_index)?;
    let team_a: HashSet<&String> = result.team_a.iter().collect();
    if let Some(name) = result.team_b.iter().find(|name| team_a.contains(name)) {
        return Err(invalid(InputIssue::SharedPlayer {
            match_index,
            name: name.clone(),
        }));
    }
    Ok(())
}

fn check_scores(result: &MatchResult, match_index: usize) -> Result<(), RankingErrors> {
    for score in [result.score_a, result.score_b] {
        if score < 0 {
            return Err(invalid(InputIssue::NegativeScore {
                match_index: Some(match_index),
                score,
            }));
        }
    }
    Ok(())
}

/// Checks that a result can be recorded at all.
///
/// This is the acceptance check done before a result is stored: the teams
/// are well formed, the scores are not negative and one side reached the
/// target score of the rules. The leaderboard itself does not look at the
/// target score.
///
/// `match_index` is only used to locate the problem in the error.
pub fn validate_result(
    result: &MatchResult,
    match_index: usize,
    rules: &RpRules,
) -> Result<(), RankingErrors> {
    check_composition(result, match_index)?;
    check_scores(result, match_index)?;
    if result.score_a.max(result.score_b) < rules.target_score {
        return Err(invalid(InputIssue::Incomplete {
            score_a: result.score_a,
            score_b: result.score_b,
            target_score: rules.target_score,
        }));
    }
    Ok(())
}

/// Computes the leaderboard with the default rules.
///
/// Arguments:
/// * `participants` the registered participants. All of them appear in the
/// leaderboard, even without any match played.
/// * `results` all the results recorded so far.
///
/// A result that names an unregistered participant is rejected. See
/// [`leaderboard_with_rules`] to register such names instead.
pub fn leaderboard(
    participants: &[String],
    results: &[MatchResult],
) -> Result<Vec<LeaderboardRow>, RankingErrors> {
    leaderboard_with_rules(participants, results, &RpRules::DEFAULT_RULES)
}

/// Computes the leaderboard from scratch.
///
/// The rows are sorted by average RP (descending), then by number of matches
/// (descending), then by name (ascending). The rank is the 1-based position
/// in that order.
pub fn leaderboard_with_rules(
    participants: &[String],
    results: &[MatchResult],
    rules: &RpRules,
) -> Result<Vec<LeaderboardRow>, RankingErrors> {
    info!(
        "Processing {:?} results for {:?} participants, rules: {:?}",
        results.len(),
        participants.len(),
        rules
    );

    let mut tally: HashMap<String, Tally> = participants
        .iter()
        .map(|name| (name.clone(), Tally::EMPTY))
        .collect();
    if tally.len() < participants.len() {
        debug!(
            "leaderboard: {} duplicate participant names collapsed",
            participants.len() - tally.len()
        );
    }

    for (match_index, result) in results.iter().enumerate() {
        check_composition(result, match_index)?;
        check_scores(result, match_index)?;
        let (rp_a, rp_b) = award(result.score_a, result.score_b)?;
        debug!(
            "leaderboard: match {}: {:?} {} RP, {:?} {} RP",
            match_index, result.team_a, rp_a, result.team_b, rp_b
        );

        for (team, rp) in [(&result.team_a, rp_a), (&result.team_b, rp_b)] {
            for name in team.iter() {
                if !tally.contains_key(name) {
                    match rules.unknown_participant_mode {
                        UnknownParticipantMode::Reject => {
                            return Err(invalid(InputIssue::UnknownParticipant {
                                match_index,
                                name: name.clone(),
                            }));
                        }
                        UnknownParticipantMode::Register => {
                            warn!(
                                "leaderboard: match {}: registering unknown participant {:?}",
                                match_index, name
                            );
                            tally.insert(name.clone(), Tally::EMPTY);
                        }
                    }
                }
                if let Some(t) = tally.get_mut(name) {
                    t.record(rp);
                }
            }
        }
    }

    let mut sorted: Vec<(String, Tally)> = tally.into_iter().collect();
    sorted.sort_by(|(name_a, tally_a), (name_b, tally_b)| {
        tally_b
            .cmp_average(tally_a)
            .then(tally_b.matches.cmp(&tally_a.matches))
            .then(name_a.cmp(name_b))
    });

    let rows: Vec<LeaderboardRow> = sorted
        .into_iter()
        .enumerate()
        .map(|(idx, (participant, t))| LeaderboardRow {
            rank: idx + 1,
            participant,
            total_rp: t.total_rp,
            matches: t.matches,
            average_rp: t.average(),
        })
        .collect();
    for row in rows.iter() {
        debug!(
            "leaderboard: {:3}. {} total {} matches {} average {:.2}",
            row.rank, row.participant, row.total_rp, row.matches, row.average_rp
        );
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|s| s.to_string()).collect()
    }

    fn issue(res: Result<Vec<LeaderboardRow>, RankingErrors>) -> InputIssue {
        match res {
            Err(e) => e.issue().clone(),
            Ok(rows) => panic!("expected an error, got {:?}", rows),
        }
    }

    #[test]
    fn awards_always_sum_to_1000() {
        for a in (0..4000).step_by(37) {
            for b in (0..4000).step_by(53) {
                let (rp_a, rp_b) = award(a, b).unwrap();
                assert_eq!(rp_a + rp_b, 1000, "award({}, {})", a, b);
            }
        }
    }

    #[test]
    fn near_tie_is_a_draw() {
        assert_eq!(award(2000, 2000).unwrap(), (500, 500));
        assert_eq!(award(2099, 2000).unwrap(), (500, 500));
        assert_eq!(award(2000, 2099).unwrap(), (500, 500));
        assert_eq!(award(0, 99).unwrap(), (500, 500));
    }

    #[test]
    fn band_edges() {
        assert_eq!(award(2100, 2000).unwrap(), (600, 400));
        assert_eq!(award(2000, 2100).unwrap(), (400, 600));
        assert_eq!(award(2299, 2000).unwrap(), (600, 400));
        assert_eq!(award(2300, 2000).unwrap(), (700, 300));
        assert_eq!(award(2499, 2000).unwrap(), (700, 300));
        assert_eq!(award(2500, 2000).unwrap(), (750, 250));
        assert_eq!(award(2000, 2699).unwrap(), (250, 750));
        assert_eq!(award(2700, 2000).unwrap(), (800, 200));
        assert_eq!(award(2999, 2000).unwrap(), (800, 200));
        assert_eq!(award(3000, 2000).unwrap(), (900, 100));
        assert_eq!(award(0, 5000).unwrap(), (100, 900));
    }

    #[test]
    fn negative_score_is_rejected() {
        assert_eq!(
            award(-10, 2000),
            Err(RankingErrors::InvalidInput(InputIssue::NegativeScore {
                match_index: None,
                score: -10
            }))
        );
        assert!(award(2000, -1).is_err());
    }

    #[test]
    fn empty_results() {
        init();
        let rows = leaderboard(&names(&["Dora", "Alba", "Carlo", "Bice"]), &[]).unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.participant.as_str()).collect();
        assert_eq!(order, vec!["Alba", "Bice", "Carlo", "Dora"]);
        for (idx, row) in rows.iter().enumerate() {
            assert_eq!(row.rank, idx + 1);
            assert_eq!(row.total_rp, 0);
            assert_eq!(row.matches, 0);
            assert_eq!(row.average_rp, 0.0);
        }
    }

    #[test]
    fn single_match() {
        init();
        let results = vec![MatchResult::new(["P1", "P2"], ["P3", "P4"], 2500, 2000)];
        let rows = leaderboard(&names(&["P4", "P3", "P2", "P1"]), &results).unwrap();
        let summary: Vec<(usize, &str, u64, u32, f64)> = rows
            .iter()
            .map(|r| {
                (
                    r.rank,
                    r.participant.as_str(),
                    r.total_rp,
                    r.matches,
                    r.average_rp,
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "P1", 750, 1, 750.0),
                (2, "P2", 750, 1, 750.0),
                (3, "P3", 250, 1, 250.0),
                (4, "P4", 250, 1, 250.0),
            ]
        );
    }

    #[test]
    fn ties_use_matches_then_name() {
        init();
        // Zoe and Yann have a 500 average over two matches, everyone else over one.
        let results = vec![
            MatchResult::new(["Zoe", "Yann"], ["Xena", "Walt"], 2000, 2000),
            MatchResult::new(["Vera", "Ugo"], ["Zoe", "Yann"], 2000, 2040),
        ];
        let participants = names(&["Zoe", "Yann", "Xena", "Walt", "Vera", "Ugo", "Tea"]);
        let rows = leaderboard(&participants, &results).unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.participant.as_str()).collect();
        assert_eq!(
            order,
            vec!["Yann", "Zoe", "Ugo", "Vera", "Walt", "Xena", "Tea"]
        );
    }

    #[test]
    fn averages_are_compared_exactly() {
        init();
        // 1250 / 3 and 1550 / 3 against whole averages.
        let results = vec![
            MatchResult::new(["A", "B"], ["C", "D"], 2500, 2000),
            MatchResult::new(["A", "C"], ["E", "F"], 2000, 2150),
            MatchResult::new(["B", "D"], ["E", "F"], 2050, 2000),
            MatchResult::new(["C", "E"], ["A", "D"], 3100, 2000),
        ];
        let rows = leaderboard(&names(&["A", "B", "C", "D", "E", "F"]), &results).unwrap();
        let order: Vec<(&str, u64, u32)> = rows
            .iter()
            .map(|r| (r.participant.as_str(), r.total_rp, r.matches))
            .collect();
        assert_eq!(
            order,
            vec![
                ("E", 2000, 3),
                ("B", 1250, 2),
                ("F", 1100, 2),
                ("C", 1550, 3),
                ("A", 1250, 3),
                ("D", 850, 3),
            ]
        );
    }

    #[test]
    fn leaderboard_is_repeatable() {
        let results = vec![
            MatchResult::new(["A", "B"], ["C", "D"], 2300, 2000),
            MatchResult::new(["A", "C"], ["B", "D"], 2000, 3500),
        ];
        let participants = names(&["A", "B", "C", "D"]);
        let first = leaderboard(&participants, &results).unwrap();
        let second = leaderboard(&participants, &results).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn shared_player_is_rejected() {
        let results = vec![MatchResult::new(["A", "B"], ["B", "C"], 2500, 2000)];
        assert_eq!(
            issue(leaderboard(&names(&["A", "B", "C"]), &results)),
            InputIssue::SharedPlayer {
                match_index: 0,
                name: "B".to_string()
            }
        );
    }

    #[test]
    fn malformed_teams_are_rejected() {
        let participants = names(&["A", "B", "C", "D", "E"]);
        let three = MatchResult {
            team_a: names(&["A", "B", "E"]),
            team_b: names(&["C", "D"]),
            score_a: 2000,
            score_b: 1000,
        };
        assert_eq!(
            issue(leaderboard(&participants, &[three])),
            InputIssue::TeamSize {
                match_index: 0,
                side: Side::TeamA,
                size: 3
            }
        );

        let ok = MatchResult::new(["A", "B"], ["C", "D"], 2000, 1000);
        let twice = MatchResult::new(["A", "B"], ["C", "C"], 2000, 1000);
        assert_eq!(
            issue(leaderboard(&participants, &[ok, twice])),
            InputIssue::DuplicateInTeam {
                match_index: 1,
                side: Side::TeamB,
                name: "C".to_string()
            }
        );
    }

    #[test]
    fn unknown_participant() {
        init();
        let results = vec![MatchResult::new(["A", "B"], ["C", "Nemo"], 2000, 2300)];
        let participants = names(&["A", "B", "C"]);
        assert_eq!(
            issue(leaderboard(&participants, &results)),
            InputIssue::UnknownParticipant {
                match_index: 0,
                name: "Nemo".to_string()
            }
        );

        let rules = RpRules {
            unknown_participant_mode: UnknownParticipantMode::Register,
            ..RpRules::DEFAULT_RULES
        };
        let rows = leaderboard_with_rules(&participants, &results, &rules).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].participant, "C");
        assert_eq!(rows[1].participant, "Nemo");
        assert_eq!(rows[1].total_rp, 700);
    }

    #[test]
    fn negative_score_in_results() {
        let results = vec![
            MatchResult::new(["A", "B"], ["C", "D"], 2000, 1500),
            MatchResult::new(["A", "B"], ["C", "D"], 2000, -5),
        ];
        assert_eq!(
            issue(leaderboard(&names(&["A", "B", "C", "D"]), &results)),
            InputIssue::NegativeScore {
                match_index: Some(1),
                score: -5
            }
        );
        assert_eq!(
            validate_result(&results[1], 7, &RpRules::DEFAULT_RULES)
                .unwrap_err()
                .issue(),
            &InputIssue::NegativeScore {
                match_index: Some(7),
                score: -5
            }
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        init();
        let rules = RpRules {
            unknown_participant_mode: UnknownParticipantMode::Register,
            ..RpRules::DEFAULT_RULES
        };
        let results = vec![MatchResult::new(["", "B"], ["C", "D"], 2000, 0)];
        assert_eq!(
            issue(leaderboard_with_rules(&[], &results, &rules)),
            InputIssue::BlankName {
                match_index: 0,
                side: Side::TeamA
            }
        );

        let spaces = MatchResult::new(["A", "B"], ["C", "  "], 2000, 0);
        assert_eq!(
            validate_result(&spaces, 2, &rules).unwrap_err().issue(),
            &InputIssue::BlankName {
                match_index: 2,
                side: Side::TeamB
            }
        );
    }

    #[test]
    fn validation_requires_target_score() {
        let rules = RpRules::DEFAULT_RULES;
        let complete = MatchResult::new(["A", "B"], ["C", "D"], 1800, 2000);
        assert!(validate_result(&complete, 0, &rules).is_ok());

        let short = MatchResult::new(["A", "B"], ["C", "D"], 1990, 1500);
        assert_eq!(
            validate_result(&short, 3, &rules),
            Err(RankingErrors::InvalidInput(InputIssue::Incomplete {
                score_a: 1990,
                score_b: 1500,
                target_score: 2000
            }))
        );

        let lower = RpRules {
            target_score: 1500,
            ..RpRules::DEFAULT_RULES
        };
        assert!(validate_result(&short, 3, &lower).is_ok());
    }
}
