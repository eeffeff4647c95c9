pub use crate::config::*;

use log::{debug, info};

use crate::{leaderboard_with_rules, validate_result};

/// A builder for registering participants and results.
///
/// It keeps the tournament in memory and recomputes the leaderboard from
/// scratch on every call, so it is never out of date with the results.
///
/// ```
/// pub use ranking_points::builder::Builder;
/// pub use ranking_points::RpRules;
/// # use ranking_points::RankingErrors;
///
/// let mut builder = Builder::new(&RpRules::DEFAULT_RULES)?
///     .participants(&["Anna".to_string(), "Bruno".to_string()])?;
/// builder.add_participant("Carla");
/// builder.add_participant("Dario");
///
/// builder.add_result(&["Anna", "Bruno"], &["Carla", "Dario"], 2100, 2000)?;
///
/// let rows = builder.leaderboard()?;
/// assert_eq!(rows[0].total_rp, 600);
///
/// # Ok::<(), RankingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: RpRules,
    pub(crate) _participants: Vec<String>,
    pub(crate) _results: Vec<MatchResult>,
}

impl Builder {
    pub fn new(rules: &RpRules) -> Result<Builder, RankingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _participants: Vec::new(),
            _results: Vec::new(),
        })
    }

    /// Replaces the registered participants. Duplicated names are only kept once.
    pub fn participants(self, names: &[String]) -> Result<Builder, RankingErrors> {
        let mut builder = Builder {
            _rules: self._rules,
            _participants: Vec::new(),
            _results: self._results,
        };
        for name in names {
            builder.add_participant(name);
        }
        Ok(builder)
    }

    /// Registers a participant.
    ///
    /// Returns false if a participant with exactly the same name already exists.
    /// Blank names are never registered.
    pub fn add_participant(&mut self, name: &str) -> bool {
        if name.trim().is_empty() || self._participants.iter().any(|p| p == name) {
            debug!("add_participant: skipping {:?}", name);
            return false;
        }
        self._participants.push(name.to_string());
        true
    }

    pub fn registered(&self) -> &[String] {
        &self._participants
    }

    pub fn results(&self) -> &[MatchResult] {
        &self._results
    }

    /// Records the result of a match.
    ///
    /// The result is refused if it is not complete, if the teams are not two
    /// distinct pairs, or if it names an unregistered participant while the
    /// rules reject unknown participants.
    pub fn add_result(
        &mut self,
        team_a: &[&str],
        team_b: &[&str],
        score_a: i64,
        score_b: i64,
    ) -> Result<(), RankingErrors> {
        self.add_result_2(make_result(team_a, team_b, score_a, score_b))
    }

    pub fn add_result_2(&mut self, result: MatchResult) -> Result<(), RankingErrors> {
        self.check(&result, self._results.len())?;
        self._results.push(result);
        Ok(())
    }

    /// Replaces the result at the given position. There is no history of edits.
    pub fn replace_result(
        &mut self,
        match_index: usize,
        result: MatchResult,
    ) -> Result<(), RankingErrors> {
        self.check(&result, match_index)?;
        let len = self._results.len();
        let slot = self
            ._results
            .get_mut(match_index)
            .ok_or(RankingErrors::InvalidInput(InputIssue::MatchIndex {
                match_index,
                len,
            }))?;
        *slot = result;
        Ok(())
    }

    pub fn remove_result(&mut self, match_index: usize) -> Result<MatchResult, RankingErrors> {
        if match_index >= self._results.len() {
            return Err(RankingErrors::InvalidInput(InputIssue::MatchIndex {
                match_index,
                len: self._results.len(),
            }));
        }
        Ok(self._results.remove(match_index))
    }

    /// Computes the leaderboard from all the recorded results.
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardRow>, RankingErrors> {
        info!(
            "Builder: computing leaderboard for {} results",
            self._results.len()
        );
        leaderboard_with_rules(&self._participants, &self._results, &self._rules)
    }

    fn check(&self, result: &MatchResult, match_index: usize) -> Result<(), RankingErrors> {
        validate_result(result, match_index, &self._rules)?;
        if self._rules.unknown_participant_mode == UnknownParticipantMode::Reject {
            let unknown = result
                .team_a
                .iter()
                .chain(result.team_b.iter())
                .find(|name| !self._participants.contains(*name));
            if let Some(name) = unknown {
                return Err(RankingErrors::InvalidInput(
                    InputIssue::UnknownParticipant {
                        match_index,
                        name: name.clone(),
                    },
                ));
            }
        }
        Ok(())
    }
}

fn make_result(team_a: &[&str], team_b: &[&str], score_a: i64, score_b: i64) -> MatchResult {
    MatchResult {
        team_a: team_a.iter().map(|s| s.to_string()).collect(),
        team_b: team_b.iter().map(|s| s.to_string()).collect(),
        score_a,
        score_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four() -> Builder {
        let names: Vec<String> = ["Anna", "Bruno", "Carla", "Dario"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Builder::new(&RpRules::DEFAULT_RULES)
            .unwrap()
            .participants(&names)
            .unwrap()
    }

    #[test]
    fn participants_are_unique() {
        let mut builder = four();
        assert!(!builder.add_participant("Anna"));
        assert!(!builder.add_participant("  "));
        assert!(builder.add_participant("anna"));
        assert_eq!(builder.registered().len(), 5);
    }

    #[test]
    fn incomplete_result_is_refused() {
        let mut builder = four();
        let res = builder.add_result(&["Anna", "Bruno"], &["Carla", "Dario"], 1950, 1200);
        assert!(matches!(
            res,
            Err(RankingErrors::InvalidInput(InputIssue::Incomplete { .. }))
        ));
        assert!(builder.results().is_empty());
    }

    #[test]
    fn unknown_participant_is_refused() {
        let mut builder = four();
        let res = builder.add_result(&["Anna", "Bruno"], &["Carla", "Elena"], 2000, 1200);
        assert_eq!(
            res,
            Err(RankingErrors::InvalidInput(
                InputIssue::UnknownParticipant {
                    match_index: 0,
                    name: "Elena".to_string()
                }
            ))
        );
    }

    #[test]
    fn edits_are_reflected_in_the_leaderboard() {
        let mut builder = four();
        builder
            .add_result(&["Anna", "Bruno"], &["Carla", "Dario"], 3000, 2000)
            .unwrap();
        assert_eq!(builder.leaderboard().unwrap()[0].total_rp, 900);

        builder
            .replace_result(
                0,
                MatchResult::new(["Anna", "Bruno"], ["Carla", "Dario"], 2000, 2300),
            )
            .unwrap();
        let rows = builder.leaderboard().unwrap();
        assert_eq!(rows[0].participant, "Carla");
        assert_eq!(rows[0].total_rp, 700);

        builder.remove_result(0).unwrap();
        assert!(builder.leaderboard().unwrap().iter().all(|r| r.matches == 0));
        assert!(builder.remove_result(0).is_err());
    }
}
