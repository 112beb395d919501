use crate::header::HeaderLayout;
use crate::models::{CellValue, SheetModel, Worksheet};

/// Extracts the patient body of a sheet into positional row vectors.
pub struct PatientMatrixReader;

impl PatientMatrixReader {
    /// Returns `None` when the sheet is structurally unusable: fewer than
    /// two header columns or no non-blank data rows. Callers treat that as
    /// a silent skip, not an error.
    pub fn read(sheet: &Worksheet, layout: &HeaderLayout) -> Option<SheetModel> {
        if layout.headers.len() < 2 {
            log::debug!(
                "Sheet '{}' skipped: only {} header column(s)",
                sheet.name,
                layout.headers.len()
            );
            return None;
        }

        let rows: Vec<Vec<CellValue>> = sheet
            .rows
            .iter()
            .skip(layout.header_row_count)
            .filter(|row| row.iter().any(|cell| !cell.is_blank()))
            .map(|row| {
                let mut padded = row.clone();
                padded.resize(sheet.column_count, CellValue::Empty);
                padded
            })
            .collect();

        if rows.is_empty() {
            log::debug!("Sheet '{}' skipped: no data rows", sheet.name);
            return None;
        }

        Some(SheetModel {
            sheet_number: sheet.index + 1,
            sheet_name: sheet.name.clone(),
            headers: layout.headers.clone(),
            rows,
        })
    }
}
