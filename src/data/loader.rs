//! Data Loader Module
//! Reads the census CSV, the geography workbook and the crime CSV.

use super::columns::*;
use super::merged::MergedTable;
use super::processor::{DataProcessor, ProcessorError};
use crate::config::SourceConfig;
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Column '{column}' not found in {file}")]
    MissingColumn { file: String, column: String },
    #[error("Sheet '{sheet}' not found in {}", .path.display())]
    MissingSheet { path: PathBuf, sheet: String },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read spreadsheet: {0}")]
    SpreadsheetError(#[from] calamine::Error),
    #[error("Failed to merge data: {0}")]
    ProcessorError(#[from] ProcessorError),
}

/// Reads the three input datasets from the configured locations.
pub struct DataLoader {
    sources: SourceConfig,
}

impl DataLoader {
    pub fn new(sources: SourceConfig) -> Self {
        Self { sources }
    }

    /// Read all sources and run the merge pipeline. Any failure aborts the load.
    pub fn load_and_merge(&self) -> Result<MergedTable, LoaderError> {
        let census = self.read_census()?;
        let regions = self.read_regions()?;
        let crime = self.read_crime()?;

        let (table, report) = DataProcessor::merge(&census, &regions, &crime)?;
        report.log();
        Ok(table)
    }

    /// Census income, projected to region code and weekly median income.
    pub fn read_census(&self) -> Result<DataFrame, LoaderError> {
        let path = &self.sources.census_csv;
        let df = Self::scan_csv(path, &[SAL_CODE, MEDIAN_INCOME])?
            .select([
                col(SAL_CODE).cast(DataType::String),
                col(MEDIAN_INCOME).strict_cast(DataType::Float64),
            ])
            .collect()?;

        info!("Read {} census rows from {}", df.height(), path.display());
        Ok(df)
    }

    /// Geography descriptors from the configured sheet, all structure types.
    pub fn read_regions(&self) -> Result<DataFrame, LoaderError> {
        let path = &self.sources.geography_workbook;
        let sheet = &self.sources.geography_sheet;
        if !path.exists() {
            return Err(LoaderError::MissingFile(path.clone()));
        }

        let mut workbook = open_workbook_auto(path)?;
        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(LoaderError::MissingSheet {
                path: path.clone(),
                sheet: sheet.clone(),
            });
        }

        let range = workbook.worksheet_range(sheet)?;
        let df = Self::regions_from_range(&range, &format!("{}[{}]", path.display(), sheet))?;

        info!(
            "Read {} geography rows from {} sheet {}",
            df.height(),
            path.display(),
            sheet
        );
        Ok(df)
    }

    /// Raw crime rows, all columns.
    pub fn read_crime(&self) -> Result<DataFrame, LoaderError> {
        let path = &self.sources.crime_csv;
        let df = Self::scan_csv(path, &[SUBURB, CRIME_MONTH])?.collect()?;

        info!("Read {} crime rows from {}", df.height(), path.display());
        Ok(df)
    }

    /// Open a CSV lazily after checking the file and its header.
    fn scan_csv(path: &Path, required: &[&str]) -> Result<LazyFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::MissingFile(path.to_path_buf()));
        }

        // Infer over the whole file; a type change late in the file must not be lost
        let mut lazy = LazyCsvReader::new(path)
            .with_infer_schema_length(None)
            .finish()?;

        let schema = lazy.collect_schema()?;
        if let Some(missing) = required.iter().find(|column| !schema.contains(column)) {
            return Err(LoaderError::MissingColumn {
                file: path.display().to_string(),
                column: missing.to_string(),
            });
        }

        Ok(lazy)
    }

    /// Build the geography table from a worksheet whose first row is the header.
    ///
    /// Output columns: [`ASGS_Structure`, `Census_Code_2021`, `Census_Name_2021`]
    pub fn regions_from_range(range: &Range<Data>, file: &str) -> Result<DataFrame, LoaderError> {
        let wanted = [ASGS_STRUCTURE, CENSUS_CODE, CENSUS_NAME];

        let mut rows = range.rows();
        let header: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .unwrap_or_default();

        let indices = wanted
            .iter()
            .map(|column| {
                header
                    .iter()
                    .position(|name| name == column)
                    .ok_or_else(|| LoaderError::MissingColumn {
                        file: file.to_string(),
                        column: column.to_string(),
                    })
            })
            .collect::<Result<Vec<usize>, _>>()?;

        let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); wanted.len()];
        for row in rows {
            for (column_values, &idx) in values.iter_mut().zip(&indices) {
                column_values.push(row.get(idx).and_then(cell_text));
            }
        }

        let columns = wanted
            .iter()
            .zip(values)
            .map(|(name, column_values)| Column::new((*name).into(), column_values))
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

/// Spreadsheet cell as text; integral floats lose their fractional part.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Temporary directory removed on drop.
    struct ScratchDir(PathBuf);

    impl std::ops::Deref for ScratchDir {
        type Target = Path;

        fn deref(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn scratch_dir(name: &str) -> ScratchDir {
        let dir = std::env::temp_dir().join(format!(
            "suburb_insights_{}_{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        ScratchDir(dir)
    }

    const GEOGRAPHY_SHEET: &str = "2021_ASGS_Non_ABS_Structures";

    /// Write an `.xlsx` with one sheet; cells that parse as numbers are stored as numbers.
    fn write_workbook(path: &Path, sheet: &str, rows: &[&[&str]]) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let written = match value.parse::<f64>() {
                    Ok(number) => worksheet.write_number(r as u32, c as u16, number),
                    Err(_) => worksheet.write_string(r as u32, c as u16, *value),
                };
                written.unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    const GEOGRAPHY_ROWS: &[&[&str]] = &[
        &["ASGS_Structure", "Census_Code_2021", "Census_Name_2021", "Area_sqkm"],
        &["SAL", "SAL10001", "Abbotsford", "1.2"],
        &["SAL", "SAL10002", "Bondi", "1.0"],
        &["LGA", "SAL10003", "Cessnock", "1965.0"],
        &["LGA", "10050", "Albury", "305.9"],
    ];

    fn loader_for(dir: &Path) -> DataLoader {
        DataLoader::new(SourceConfig {
            census_csv: dir.join("census.csv"),
            geography_workbook: dir.join("geography.xlsx"),
            geography_sheet: GEOGRAPHY_SHEET.to_string(),
            crime_csv: dir.join("crime.csv"),
        })
    }

    fn worksheet(rows: &[&[Data]]) -> Range<Data> {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(1);
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width as u32 - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn census_is_projected_to_code_and_income() {
        let dir = scratch_dir("census_projection");
        fs::write(
            dir.join("census.csv"),
            "SAL_CODE_2021,Median_age_persons,Median_tot_hhd_inc_weekly\n\
             SAL10001,38,1500\n\
             SAL10002,41,2100\n",
        )
        .unwrap();

        let census = loader_for(&dir).read_census().unwrap();
        let names: Vec<String> = census
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, [SAL_CODE, MEDIAN_INCOME]);
        assert_eq!(census.height(), 2);
        assert_eq!(
            census.column(MEDIAN_INCOME).unwrap().f64().unwrap().get(1),
            Some(2100.0)
        );
    }

    #[test]
    fn census_without_income_column_fails() {
        let dir = scratch_dir("census_missing_column");
        fs::write(dir.join("census.csv"), "SAL_CODE_2021,Median_age_persons\nSAL1,38\n").unwrap();

        let err = loader_for(&dir).read_census().unwrap_err();
        match err {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, MEDIAN_INCOME),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_files_are_reported() {
        let dir = scratch_dir("missing_files");
        let loader = loader_for(&dir.join("absent"));

        assert!(matches!(loader.read_census(), Err(LoaderError::MissingFile(_))));
        assert!(matches!(loader.read_regions(), Err(LoaderError::MissingFile(_))));
        assert!(matches!(loader.read_crime(), Err(LoaderError::MissingFile(_))));
        assert!(matches!(loader.load_and_merge(), Err(LoaderError::MissingFile(_))));
    }

    #[test]
    fn crime_keeps_all_columns() {
        let dir = scratch_dir("crime_columns");
        fs::write(
            dir.join("crime.csv"),
            "Suburb,Offence category,Jul 2021,Aug 2021\n\
             Bondi,Theft,2,3\n\
             Bondi,Assault,1,4\n",
        )
        .unwrap();

        let crime = loader_for(&dir).read_crime().unwrap();
        assert_eq!(crime.width(), 4);
        assert_eq!(crime.height(), 2);
    }

    #[test]
    fn crime_without_month_column_fails() {
        let dir = scratch_dir("crime_missing_month");
        fs::write(dir.join("crime.csv"), "Suburb,Jul 2021\nBondi,2\n").unwrap();

        let err = loader_for(&dir).read_crime().unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn { .. }));
    }

    #[test]
    fn regions_are_read_from_header_row() {
        let range = worksheet(&[
            &[
                text("ASGS_Structure"),
                text("Census_Code_2021"),
                text("Census_Name_2021"),
                text("Area_sqkm"),
            ],
            &[text("SAL"), text("SAL10001"), text("Abbotsford"), Data::Float(1.2)],
            &[text("LGA"), Data::Float(10050.0), text("Albury"), Data::Float(305.9)],
            &[text("SAL"), Data::Empty, text("Bondi"), Data::Empty],
        ]);

        let regions = DataLoader::regions_from_range(&range, "geography.xlsx").unwrap();
        assert_eq!(regions.width(), 3);
        assert_eq!(regions.height(), 3);

        let codes: Vec<Option<&str>> = regions
            .column(CENSUS_CODE)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(codes, [Some("SAL10001"), Some("10050"), None]);
    }

    #[test]
    fn regions_without_name_column_fail() {
        let range = worksheet(&[
            &[text("ASGS_Structure"), text("Census_Code_2021")],
            &[text("SAL"), text("SAL10001")],
        ]);

        let err = DataLoader::regions_from_range(&range, "geography.xlsx").unwrap_err();
        match err {
            LoaderError::MissingColumn { column, file } => {
                assert_eq!(column, CENSUS_NAME);
                assert_eq!(file, "geography.xlsx");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cell_text_formats_numbers_and_skips_blanks() {
        assert_eq!(cell_text(&Data::Float(10001.0)), Some("10001".to_string()));
        assert_eq!(cell_text(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_text(&Data::Int(7)), Some("7".to_string()));
        assert_eq!(cell_text(&Data::Empty), None);
    }

    #[test]
    fn scratch_dir_is_removed_on_drop() {
        let path = {
            let dir = scratch_dir("cleanup");
            fs::write(dir.join("file.csv"), "a\n1\n").unwrap();
            dir.to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn crime_value_changing_type_late_in_file_is_summed_exactly() {
        let dir = scratch_dir("crime_late_float");
        let mut csv = String::from("Suburb,Offence category,Aug 2021\n");
        for _ in 0..10_000 {
            csv.push_str("Bondi,Theft,1\n");
        }
        csv.push_str("Bondi,Fraud,2.5\n");
        fs::write(dir.join("crime.csv"), csv).unwrap();

        let crime = loader_for(&dir).read_crime().unwrap();
        let totals = DataProcessor::aggregate_crime(&crime).unwrap();
        assert_eq!(
            totals.column(CRIME_COUNT).unwrap().f64().unwrap().get(0),
            Some(10_002.5)
        );
    }

    #[test]
    fn census_with_unparsable_income_fails() {
        let dir = scratch_dir("census_bad_income");
        fs::write(
            dir.join("census.csv"),
            "SAL_CODE_2021,Median_tot_hhd_inc_weekly\n\
             SAL10001,1500\n\
             SAL10002,not stated\n",
        )
        .unwrap();

        let err = loader_for(&dir).read_census().unwrap_err();
        assert!(matches!(err, LoaderError::CsvError(_)));
    }

    #[test]
    fn unknown_sheet_is_reported() {
        let dir = scratch_dir("regions_missing_sheet");
        write_workbook(&dir.join("geography.xlsx"), "Sheet1", GEOGRAPHY_ROWS);

        match loader_for(&dir).read_regions().unwrap_err() {
            LoaderError::MissingSheet { sheet, .. } => assert_eq!(sheet, GEOGRAPHY_SHEET),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn regions_are_read_from_workbook_sheet() {
        let dir = scratch_dir("regions_workbook");
        write_workbook(&dir.join("geography.xlsx"), GEOGRAPHY_SHEET, GEOGRAPHY_ROWS);

        let regions = loader_for(&dir).read_regions().unwrap();
        let names: Vec<String> = regions
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, [ASGS_STRUCTURE, CENSUS_CODE, CENSUS_NAME]);
        assert_eq!(regions.height(), 4);

        let codes: Vec<Option<&str>> = regions
            .column(CENSUS_CODE)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            codes,
            [Some("SAL10001"), Some("SAL10002"), Some("SAL10003"), Some("10050")]
        );
    }

    #[test]
    fn load_and_merge_over_source_files() {
        let dir = scratch_dir("load_and_merge");
        fs::write(
            dir.join("census.csv"),
            "SAL_CODE_2021,Median_tot_hhd_inc_weekly\n\
             SAL10001,1500\n\
             SAL10002,2100\n\
             SAL10003,900\n",
        )
        .unwrap();
        write_workbook(&dir.join("geography.xlsx"), GEOGRAPHY_SHEET, GEOGRAPHY_ROWS);
        fs::write(
            dir.join("crime.csv"),
            "Suburb,Offence category,Aug 2021\n\
             Abbotsford,Theft,3\n\
             Bondi,Theft,10\n\
             Abbotsford,Assault,4\n\
             Cessnock,Theft,7\n",
        )
        .unwrap();

        let table = loader_for(&dir).load_and_merge().unwrap();
        assert_eq!(table.height(), 2);

        let top = table.top_suburbs_by_crime(20).unwrap();
        let totals: Vec<(&str, f64)> = top
            .iter()
            .map(|s| (s.suburb.as_str(), s.crime_count))
            .collect();
        assert_eq!(totals, [("Bondi", 10.0), ("Abbotsford", 7.0)]);
    }
}
