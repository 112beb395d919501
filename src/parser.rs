use crate::models::{CellValue, Worksheet};
use crate::Result;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// Loads cohort sheets from CSV files. Each file becomes one worksheet of
/// raw tagged cells; all header interpretation is left to the core.
pub struct WorkbookReader;

impl WorkbookReader {
    pub fn load_sheets<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Worksheet>> {
        paths
            .iter()
            .enumerate()
            .map(|(index, path)| Self::load_sheet(path, index))
            .collect()
    }

    pub fn load_sheet<P: AsRef<Path>>(path: P, index: usize) -> Result<Worksheet> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(CellValue::from_raw).collect::<Vec<_>>());
        }

        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("Sheet{}", index + 1));

        log::info!(
            "Loaded sheet '{}' ({} rows, {} columns)",
            name,
            rows.len(),
            column_count
        );

        Ok(Worksheet {
            name,
            index,
            column_count,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn loads_csv_as_tagged_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trial.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Pain BT,Pain AT 7th").unwrap();
        writeln!(file, "8,4").unwrap();
        writeln!(file, "7,").unwrap();
        drop(file);

        let sheet = WorkbookReader::load_sheet(&path, 0).unwrap();
        assert_eq!(sheet.name, "trial");
        assert_eq!(sheet.column_count, 2);
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0][0], CellValue::Text("Pain BT".to_string()));
        assert_eq!(sheet.rows[1][1], CellValue::Number(4.0));
        assert_eq!(sheet.rows[2][1], CellValue::Empty);
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ragged.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "a,b,c").unwrap();
        writeln!(file, "1").unwrap();
        drop(file);

        let sheet = WorkbookReader::load_sheet(&path, 0).unwrap();
        assert_eq!(sheet.column_count, 3);
        assert_eq!(sheet.rows[1].len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = WorkbookReader::load_sheet("/nonexistent/sheet.csv", 0);
        assert!(result.is_err());
    }
}
