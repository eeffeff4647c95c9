/*!

This is the long-form manual for `ranking_points` and `rptally`.

## Ranking points

Every match is played by two pairs. A match is over when one of the pairs
reaches the target score (2000 points unless configured otherwise). The
difference between the two final scores gives the ranking points (RP) of each
pair:

| score difference | winner RP | loser RP |
|------------------|-----------|----------|
| 0 - 99           | 500       | 500      |
| 100 - 299        | 600       | 400      |
| 300 - 499        | 700       | 300      |
| 500 - 699        | 750       | 250      |
| 700 - 999        | 800       | 200      |
| 1000 and more    | 900       | 100      |

A match won by less than 100 points counts as a draw: both pairs get 500 RP.
The two awards of a match always sum to 1000. Both players of a pair get the
RP of their pair.

## Leaderboard

Each participant accumulates the RP of all the matches they played. The
leaderboard is ordered by:
1. average RP per match played, highest first
2. number of matches played, most first
3. name, in alphabetical (byte) order

Registered participants who did not play yet appear at the bottom with an
average of 0.

A result that names someone who is not registered is an error. The rule
`"unknownParticipant": "register"` (or the `--register-unknown` flag)
registers such names on the fly instead.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values with a header row
* `xlsx` Excel workbook, header names in the first row of the worksheet

### Participants

One participant per row in a column named `Participant`. Other columns are
ignored. Empty cells are skipped and repeated names are only registered once.

| Participant |
|-------------|
| Anna        |
| Bruno       |

### Results

One match per row with the columns `a1`, `a2` (first pair), `b1`, `b2`
(second pair), `score_a` and `score_b`.

| a1   | a2    | b1    | b2    | score_a | score_b |
|------|-------|-------|-------|---------|---------|
| Anna | Bruno | Carla | Dario | 2500    | 2000    |

Every row is checked before the leaderboard is computed: the two pairs must
be made of four different people with non-blank names, the scores must not be
negative and one of them must reach the target score.

## Configuration

Instead of passing the files on the command line, a tournament can be
described in a JSON file:

```json
{
  "outputSettings": {
    "tournamentName": "Spring cup",
    "tournamentDate": "2025-04-12"
  },
  "participantSources": [{ "provider": "csv", "filePath": "participants.csv" }],
  "resultSources": [
    { "provider": "xlsx", "filePath": "results.xlsx", "excelWorksheetName": "Day 1" }
  ],
  "rules": { "targetScore": 2000, "unknownParticipant": "reject" }
}
```

File paths are relative to the directory of the configuration file. Names can
also be listed directly with a `participants` array.

## Outputs

`rptally` always prints the recorded matches and the leaderboard as tables. With `--out`, a JSON
summary is written (use `stdout` to print it). With `--csv-out`, the
leaderboard is written as a CSV file with the columns `Rank`, `Participant`,
`Total RP`, `Matches Played` and `Average RP`.

With `--reference`, the JSON summary is compared with a previously saved one
and the run fails if they differ.

*/
