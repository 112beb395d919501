use crate::models::Worksheet;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// Row 2 of a multi-row header carries before/after treatment markers.
static MARKER_ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(bt|at|before|after)\b").unwrap());

/// Row 3 of a multi-row header carries assessment-day markers.
static DAY_ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(7th|14th|21st|28th|7|14|21|28|day|d)\b").unwrap());

/// Leading rows examined when deciding where the header ends.
const HEADER_SCAN_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    /// One composite header per column, pipe-joined across the header rows.
    pub headers: Vec<String>,
    /// Number of leading rows that form the header; data starts right after.
    pub header_row_count: usize,
}

/// Decides how many leading rows compose a sheet's header and builds one
/// composite header string per column. Always produces a result; a sheet
/// with no recognizable markers gets a single-row header.
pub struct HeaderAnalyzer;

impl HeaderAnalyzer {
    pub fn analyze(sheet: &Worksheet) -> HeaderLayout {
        let candidate_rows = Self::candidate_header_rows(sheet);
        let header_row_count = Self::classify_header_rows(sheet, candidate_rows);
        let headers = Self::composite_headers(sheet, header_row_count);
        log::debug!(
            "Sheet '{}': {} header row(s) detected",
            sheet.name,
            header_row_count
        );
        HeaderLayout {
            headers,
            header_row_count,
        }
    }

    /// Number of leading rows that can still be header rows. Scanning stops
    /// at the first row where numeric cells outnumber half the columns; that
    /// row is data. Without such a row the full scan window stays in play.
    fn candidate_header_rows(sheet: &Worksheet) -> usize {
        let limit = HEADER_SCAN_ROWS.min(sheet.row_count());
        for row_idx in 0..limit {
            let numeric_cells = (0..sheet.column_count)
                .filter(|&col| sheet.cell(row_idx, col).as_number().is_some())
                .count();
            if numeric_cells as f64 > sheet.column_count as f64 / 2.0 {
                return row_idx;
            }
        }
        HEADER_SCAN_ROWS
    }

    fn classify_header_rows(sheet: &Worksheet, candidate_rows: usize) -> usize {
        let marker_row = candidate_rows >= 2 && Self::row_matches(sheet, 1, &MARKER_ROW_RE);
        let day_row = candidate_rows >= 3 && Self::row_matches(sheet, 2, &DAY_ROW_RE);
        if marker_row && day_row {
            3
        } else if marker_row {
            2
        } else {
            1
        }
    }

    fn row_matches(sheet: &Worksheet, row_idx: usize, pattern: &Regex) -> bool {
        (0..sheet.column_count).any(|col| pattern.is_match(&sheet.cell(row_idx, col).display_text()))
    }

    fn composite_headers(sheet: &Worksheet, header_row_count: usize) -> Vec<String> {
        (0..sheet.column_count)
            .map(|col| {
                (0..header_row_count)
                    .map(|row| sheet.cell(row, col).display_text())
                    .filter(|text| !text.is_empty())
                    .join(" | ")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn sheet(rows: &[&[&str]]) -> Worksheet {
        let rows: Vec<Vec<CellValue>> = rows
            .iter()
            .map(|row| row.iter().map(|cell| CellValue::from_raw(cell)).collect())
            .collect();
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        Worksheet {
            name: "Sheet1".to_string(),
            index: 0,
            column_count,
            rows,
        }
    }

    #[test]
    fn single_row_header_when_no_markers() {
        let ws = sheet(&[
            &["Vedana BT", "Vedana AT 7th", "Vedana AT 14th"],
            &["10", "5", "2"],
            &["10", "0", "10"],
        ]);
        let layout = HeaderAnalyzer::analyze(&ws);
        assert_eq!(layout.header_row_count, 1);
        assert_eq!(
            layout.headers,
            vec!["Vedana BT", "Vedana AT 7th", "Vedana AT 14th"]
        );
    }

    #[test]
    fn two_row_header_with_marker_row() {
        let ws = sheet(&[
            &["Pain", "Pain", "Swelling", "Swelling"],
            &["BT", "AT", "BT", "AT"],
            &["8", "4", "6", "3"],
        ]);
        let layout = HeaderAnalyzer::analyze(&ws);
        assert_eq!(layout.header_row_count, 2);
        assert_eq!(layout.headers[0], "Pain | BT");
        assert_eq!(layout.headers[1], "Pain | AT");
    }

    #[test]
    fn three_row_header_with_day_row() {
        let ws = sheet(&[
            &["Sl. No", "Pain", "Pain", "Pain"],
            &["", "BT", "AT", "AT"],
            &["", "", "7th day", "14th day"],
            &["1", "8", "4", "2"],
        ]);
        let layout = HeaderAnalyzer::analyze(&ws);
        assert_eq!(layout.header_row_count, 3);
        assert_eq!(layout.headers[0], "Sl. No");
        assert_eq!(layout.headers[1], "Pain | BT");
        assert_eq!(layout.headers[2], "Pain | AT | 7th day");
        assert_eq!(layout.headers[3], "Pain | AT | 14th day");
    }

    #[test]
    fn numeric_dominant_row_stops_the_scan() {
        // Row 2 is numeric-dominant data, so nothing at or below it can be
        // classified as a marker row.
        let ws = sheet(&[
            &["Pain BT", "Pain AT"],
            &["9", "4"],
            &["AT", "3"],
        ]);
        let layout = HeaderAnalyzer::analyze(&ws);
        assert_eq!(layout.header_row_count, 1);
    }

    #[test]
    fn missing_rows_contribute_nothing_to_the_join() {
        let ws = sheet(&[&["Pain", "Swelling"], &["BT", "AT"]]);
        // No numeric-dominant row at all: the full window is scanned and the
        // marker row still classifies.
        let layout = HeaderAnalyzer::analyze(&ws);
        assert_eq!(layout.header_row_count, 2);
        assert_eq!(layout.headers, vec!["Pain | BT", "Swelling | AT"]);
    }

    #[test]
    fn empty_sheet_yields_empty_headers() {
        let ws = sheet(&[]);
        let layout = HeaderAnalyzer::analyze(&ws);
        assert_eq!(layout.header_row_count, 1);
        assert!(layout.headers.is_empty());
    }
}
