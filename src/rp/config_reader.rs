use crate::rp::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "tournamentName")]
    pub tournament_name: String,
    #[serde(rename = "tournamentDate")]
    pub tournament_date: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// The configuration section of the JSON summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub tournament: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "targetScore")]
    pub target_score: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// `csv` or `xlsx`
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesSettings {
    #[serde(rename = "targetScore")]
    pub target_score: Option<JSValue>,
    /// `reject` or `register`
    #[serde(rename = "unknownParticipant")]
    pub unknown_participant: Option<String>,
}

impl RulesSettings {
    pub fn to_rules(&self) -> RpResult<RpRules> {
        let target_score = match &self.target_score {
            None => RpRules::DEFAULT_RULES.target_score,
            x => read_js_int(x)?,
        };
        if target_score <= 0 {
            whatever!("targetScore must be positive, got {}", target_score)
        }
        let unknown_participant_mode = match self.unknown_participant.as_deref() {
            None | Some("reject") => UnknownParticipantMode::Reject,
            Some("register") => UnknownParticipantMode::Register,
            Some(x) => whatever!("unknown unknownParticipant rule: {}", x),
        };
        Ok(RpRules {
            target_score,
            unknown_participant_mode,
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RpConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(rename = "participantSources", default)]
    pub participant_sources: Vec<FileSource>,
    #[serde(rename = "resultSources", default)]
    pub result_sources: Vec<FileSource>,
    #[serde(default)]
    pub rules: RulesSettings,
}

pub fn read_config(path: &str) -> RpResult<RpConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RpConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> RpResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js["results"].as_array().map(|a| a.len()));
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> RpResult<i64> {
    match x {
        Some(JSValue::Number(n)) => n.as_i64().context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s.trim().parse::<i64>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules() {
        let rules = RulesSettings::default().to_rules().unwrap();
        assert_eq!(rules, RpRules::DEFAULT_RULES);
    }

    #[test]
    fn rules_from_json() {
        let settings: RulesSettings =
            serde_json::from_str(r#"{"targetScore": "1500", "unknownParticipant": "register"}"#)
                .unwrap();
        let rules = settings.to_rules().unwrap();
        assert_eq!(rules.target_score, 1500);
        assert_eq!(
            rules.unknown_participant_mode,
            UnknownParticipantMode::Register
        );
    }

    #[test]
    fn bad_rules() {
        let settings: RulesSettings =
            serde_json::from_str(r#"{"unknownParticipant": "ignore"}"#).unwrap();
        assert!(settings.to_rules().is_err());
        let settings: RulesSettings = serde_json::from_str(r#"{"targetScore": -3}"#).unwrap();
        assert!(settings.to_rules().is_err());
        let settings: RulesSettings = serde_json::from_str(r#"{"targetScore": "lots"}"#).unwrap();
        assert!(matches!(
            settings.to_rules(),
            Err(RpError::ParsingJsonNumber {})
        ));
    }

    #[test]
    fn minimal_config() {
        let config: RpConfig = serde_json::from_str(
            r#"{"outputSettings": {"tournamentName": "Cup"},
                "resultSources": [{"provider": "csv", "filePath": "r.csv"}]}"#,
        )
        .unwrap();
        assert!(config.participants.is_empty());
        assert!(config.participant_sources.is_empty());
        assert_eq!(config.result_sources[0].excel_worksheet_name, None);
        assert_eq!(config.rules, RulesSettings::default());
    }
}
