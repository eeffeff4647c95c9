// Primitives for reading and writing CSV files.

use std::fs::File;

use csv::{Reader, Trim};
use serde::{Deserialize, Serialize};

use crate::rp::{
    io_common::{assemble_result, make_default_id, PARTICIPANT_COLUMN, RESULT_COLUMNS},
    *,
};

#[derive(Debug, Deserialize)]
struct ParticipantRow {
    #[serde(rename = "Participant")]
    participant: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultRow {
    a1: Option<String>,
    a2: Option<String>,
    b1: Option<String>,
    b2: Option<String>,
    score_a: i64,
    score_b: i64,
}

#[derive(Debug, Serialize)]
struct LeaderboardRecord<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Participant")]
    participant: &'a str,
    #[serde(rename = "Total RP")]
    total_rp: u64,
    #[serde(rename = "Matches Played")]
    matches: u32,
    #[serde(rename = "Average RP")]
    average_rp: String,
}

// Opens the file and checks that the header has all the expected columns.
fn get_reader(path: &str, columns: &[&str]) -> RpResult<Reader<File>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let headers = rdr.headers().context(CsvOpenSnafu { path })?;
    debug!("get_reader: {:?} headers: {:?}", path, headers);
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return MissingColumnSnafu {
                column: *column,
                path,
            }
            .fail();
        }
    }
    Ok(rdr)
}

pub fn read_csv_participants(path: &str) -> RpResult<Vec<String>> {
    let mut rdr = get_reader(path, &[PARTICIPANT_COLUMN])?;
    let mut res: Vec<String> = Vec::new();
    for (idx, line_r) in rdr.deserialize::<ParticipantRow>().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno, path })?;
        match line.participant {
            Some(name) if !name.is_empty() => res.push(name),
            _ => {
                debug!("read_csv_participants: line {}: no participant", lineno);
            }
        }
    }
    Ok(res)
}

pub fn read_csv_results(path: &str) -> RpResult<Vec<ParsedResult>> {
    let default_id = make_default_id(path);
    let mut rdr = get_reader(path, &RESULT_COLUMNS)?;
    let mut res: Vec<ParsedResult> = Vec::new();
    for (idx, line_r) in rdr.deserialize::<ResultRow>().enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno, path })?;
        debug!("read_csv_results: lineno: {:?} row: {:?}", lineno, &line);
        let result = assemble_result(
            [line.a1, line.a2, line.b1, line.b2],
            line.score_a,
            line.score_b,
        );
        res.push(ParsedResult {
            id: default_id(lineno),
            result,
        });
    }
    Ok(res)
}

pub fn write_csv_leaderboard(path: &str, rows: &[LeaderboardRow]) -> RpResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    for r in rows {
        wtr.serialize(LeaderboardRecord {
            rank: r.rank,
            participant: &r.participant,
            total_rp: r.total_rp,
            matches: r.matches,
            average_rp: format!("{:.2}", r.average_rp),
        })
        .context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingFileSnafu { path })?;
    Ok(())
}
