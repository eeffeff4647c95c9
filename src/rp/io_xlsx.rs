use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::rp::{
    io_common::{assemble_result, make_default_id, PARTICIPANT_COLUMN, RESULT_COLUMNS},
    *,
};

static EMPTY_CELL: DataType = DataType::Empty;

fn get_range(path: &str, cfs: &FileSource) -> RpResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &cfs.excel_worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?,
    }
    .context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}

// Maps every requested column name to its position in the header row.
fn get_col_index(columns: &[&str], header: &[DataType], path: &str) -> RpResult<Vec<usize>> {
    let mut res: Vec<usize> = Vec::new();
    for column in columns {
        let idx = header
            .iter()
            .position(|cell| matches!(cell, DataType::String(s) if s.trim() == *column))
            .context(MissingColumnSnafu {
                column: *column,
                path,
            })?;
        res.push(idx);
    }
    Ok(res)
}

fn read_name(cell: &DataType, lineno: u64) -> RpResult<Option<String>> {
    match cell {
        DataType::String(s) if s.trim().is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.trim().to_string())),
        DataType::Empty => Ok(None),
        // Spreadsheets turn numeric names into numbers.
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) if f.fract() == 0.0 => Ok(Some(format!("{}", *f as i64))),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn read_score(cell: &DataType, lineno: u64) -> RpResult<i64> {
    match cell {
        DataType::Int(i) => Ok(*i),
        DataType::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        DataType::String(s) => s.trim().parse::<i64>().ok().context(ExcelWrongCellTypeSnafu {
            lineno,
            content: s.clone(),
        }),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn is_empty_row(row: &[DataType]) -> bool {
    row.iter().all(|cell| match cell {
        DataType::Empty => true,
        DataType::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

pub fn read_xlsx_participants(path: &str, cfs: &FileSource) -> RpResult<Vec<String>> {
    let wrange = get_range(path, cfs)?;
    let header = wrange.rows().next().context(EmptyExcelSnafu { path })?;
    debug!("read_xlsx_participants: header: {:?}", header);
    let col = get_col_index(&[PARTICIPANT_COLUMN], header, path)?[0];

    let mut res: Vec<String> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(1) {
        // Spreadsheet rows are 1-based.
        let lineno = (idx + 1) as u64;
        let cell = row.get(col).unwrap_or(&EMPTY_CELL);
        if let Some(name) = read_name(cell, lineno)? {
            res.push(name);
        }
    }
    Ok(res)
}

pub fn read_xlsx_results(path: &str, cfs: &FileSource) -> RpResult<Vec<ParsedResult>> {
    let default_id = make_default_id(path);
    let wrange = get_range(path, cfs)?;
    let header = wrange.rows().next().context(EmptyExcelSnafu { path })?;
    debug!("read_xlsx_results: header: {:?}", header);
    let cols = get_col_index(&RESULT_COLUMNS, header, path)?;

    let mut res: Vec<ParsedResult> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(1) {
        let lineno = (idx + 1) as u64;
        if is_empty_row(row) {
            warn!("read_xlsx_results: skipping empty row {} of {:?}", lineno, path);
            continue;
        }
        let cell = |i: usize| row.get(cols[i]).unwrap_or(&EMPTY_CELL);
        let players = [
            read_name(cell(0), lineno)?,
            read_name(cell(1), lineno)?,
            read_name(cell(2), lineno)?,
            read_name(cell(3), lineno)?,
        ];
        let result = assemble_result(
            players,
            read_score(cell(4), lineno)?,
            read_score(cell(5), lineno)?,
        );
        debug!("read_xlsx_results: row {}: {:?}", lineno, result);
        res.push(ParsedResult {
            id: default_id(lineno as usize),
            result,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> DataType {
        DataType::String(v.to_string())
    }

    #[test]
    fn column_lookup() {
        let header = vec![
            s("Date"),
            s("a1"),
            s("a2"),
            s(" b1 "),
            s("b2"),
            s("score_a"),
            s("score_b"),
        ];
        assert_eq!(
            get_col_index(&RESULT_COLUMNS, &header, "r.xlsx").unwrap(),
            vec![1, 2, 3, 4, 5, 6]
        );
        assert!(matches!(
            get_col_index(&[PARTICIPANT_COLUMN], &header, "r.xlsx"),
            Err(RpError::MissingColumn { .. })
        ));
    }

    #[test]
    fn names() {
        assert_eq!(read_name(&s(" Anna "), 2).unwrap(), Some("Anna".to_string()));
        assert_eq!(read_name(&s("  "), 2).unwrap(), None);
        assert_eq!(read_name(&DataType::Empty, 2).unwrap(), None);
        assert_eq!(read_name(&DataType::Float(7.0), 2).unwrap(), Some("7".to_string()));
        assert!(read_name(&DataType::Bool(true), 2).is_err());
    }

    #[test]
    fn scores() {
        assert_eq!(read_score(&DataType::Float(2150.0), 4).unwrap(), 2150);
        assert_eq!(read_score(&DataType::Int(-20), 4).unwrap(), -20);
        assert_eq!(read_score(&s(" 2000 "), 4).unwrap(), 2000);
        assert!(matches!(
            read_score(&DataType::Float(2000.5), 4),
            Err(RpError::ExcelWrongCellType { lineno: 4, .. })
        ));
        assert!(read_score(&DataType::Empty, 4).is_err());
    }

    #[test]
    fn empty_rows() {
        assert!(is_empty_row(&[DataType::Empty, s(" ")]));
        assert!(!is_empty_row(&[DataType::Empty, DataType::Int(0)]));
    }

    fn workbook() -> String {
        format!("{}/xlsx_tournament/xlsx_tournament.xlsx", test_dir())
    }

    fn source(worksheet: Option<&str>) -> FileSource {
        FileSource {
            provider: "xlsx".to_string(),
            file_path: "xlsx_tournament.xlsx".to_string(),
            excel_worksheet_name: worksheet.map(|s| s.to_string()),
        }
    }

    #[test]
    fn participants_from_first_worksheet() {
        let names = read_xlsx_participants(&workbook(), &source(None)).unwrap();
        assert_eq!(names, vec!["Anna", "Bruno", "Carla", "Dario", "Elena"]);
    }

    #[test]
    fn results_from_named_worksheet() {
        let results = read_xlsx_results(&workbook(), &source(Some("Day 2"))).unwrap();
        let ids: Vec<&str> = results.iter().map(|pr| pr.id.as_str()).collect();
        // Row 3 is empty, the Table column is ignored.
        assert_eq!(
            ids,
            vec!["xlsx_tournament.xlsx-00000002", "xlsx_tournament.xlsx-00000004"]
        );
        assert_eq!(
            results[1].result,
            MatchResult::new(["Carla", "Bruno"], ["Anna", "Dario"], 2000, 2350)
        );

        let day_1 = read_xlsx_results(&workbook(), &source(Some("Day 1"))).unwrap();
        assert_eq!(day_1.len(), 1);
        assert_eq!(day_1[0].result.score_b, 3000);
    }

    #[test]
    fn missing_worksheet() {
        let res = read_xlsx_results(&workbook(), &source(Some("Day 3")));
        assert!(matches!(res, Err(RpError::MissingWorksheet { .. })));
    }

    #[test]
    fn participant_sheet_has_no_result_columns() {
        let res = read_xlsx_results(&workbook(), &source(Some("Participants")));
        assert!(matches!(res, Err(RpError::MissingColumn { .. })));
    }

    #[test]
    fn missing_workbook() {
        let cfs = FileSource {
            provider: "xlsx".to_string(),
            file_path: "missing.xlsx".to_string(),
            excel_worksheet_name: None,
        };
        let res = read_xlsx_results("/nonexistent/missing.xlsx", &cfs);
        assert!(matches!(res, Err(RpError::OpeningExcel { .. })));
    }
}
