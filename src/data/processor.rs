//! Data Processor Module
//! Pure table transformations: SAL filter, crime aggregation and the two joins.

use super::columns::*;
use super::merged::MergedTable;
use log::{debug, info, warn};
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

/// Number of unmatched region names echoed at debug level
const UNMATCHED_PREVIEW: usize = 10;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Row counts observed at each merge stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub census_rows: usize,
    pub sal_regions: usize,
    pub crime_suburbs: usize,
    pub code_matches: usize,
    pub merged_rows: usize,
    /// SAL names that matched a census code but no crime suburb, sorted
    pub unmatched_names: Vec<String>,
}

impl MergeReport {
    pub fn log(&self) {
        info!(
            "Merged {} census rows with {} SAL regions ({} matched by code)",
            self.census_rows, self.sal_regions, self.code_matches
        );
        info!(
            "Joined {} crime suburbs by name: {} rows in merged table",
            self.crime_suburbs, self.merged_rows
        );

        if !self.unmatched_names.is_empty() {
            warn!(
                "{} region names have no matching crime suburb and were dropped",
                self.unmatched_names.len()
            );
            let preview: Vec<&str> = self
                .unmatched_names
                .iter()
                .take(UNMATCHED_PREVIEW)
                .map(String::as_str)
                .collect();
            debug!("Unmatched region names: {}", preview.join(", "));
        }
    }
}

/// Stateless merge pipeline over in-memory tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep only Suburb and Locality rows of the geography table.
    pub fn filter_sal(regions: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let filtered = regions
            .clone()
            .lazy()
            .filter(col(ASGS_STRUCTURE).eq(lit(SAL_STRUCTURE)))
            .select([col(ASGS_STRUCTURE), col(CENSUS_CODE), col(CENSUS_NAME)])
            .collect()?;
        Ok(filtered)
    }

    /// Sum the monthly crime column per suburb.
    ///
    /// Output columns: [`Suburb`, `Aug-21-Crime`]
    pub fn aggregate_crime(crime: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let grouped = crime
            .clone()
            .lazy()
            .group_by_stable([col(SUBURB)])
            .agg([col(CRIME_MONTH)
                .strict_cast(DataType::Float64)
                .sum()
                .alias(CRIME_COUNT)])
            .collect()?;
        Ok(grouped)
    }

    /// Inner join census rows with SAL regions on region code.
    pub fn join_census_regions(
        census: &DataFrame,
        regions: &DataFrame,
    ) -> Result<DataFrame, ProcessorError> {
        // Alias the right key to the left name so both code columns survive the join
        let regions = regions
            .clone()
            .lazy()
            .with_column(col(CENSUS_CODE).cast(DataType::String).alias(SAL_CODE));

        let joined = census
            .clone()
            .lazy()
            .with_column(col(SAL_CODE).cast(DataType::String))
            .join(
                regions,
                [col(SAL_CODE)],
                [col(SAL_CODE)],
                JoinArgs::new(JoinType::Inner),
            )
            .collect()?;
        Ok(joined)
    }

    /// Inner join the census/region table with crime totals on region name.
    pub fn join_crime(
        census_regions: &DataFrame,
        crime_totals: &DataFrame,
    ) -> Result<DataFrame, ProcessorError> {
        let crime = crime_totals
            .clone()
            .lazy()
            .with_column(col(SUBURB).alias(CENSUS_NAME));

        let merged = census_regions
            .clone()
            .lazy()
            .join(
                crime,
                [col(CENSUS_NAME)],
                [col(CENSUS_NAME)],
                JoinArgs::new(JoinType::Inner),
            )
            .select(MERGED.map(col))
            .collect()?;
        Ok(merged)
    }

    /// Region names present after the code join that have no crime suburb.
    pub fn unmatched_names(
        census_regions: &DataFrame,
        crime_totals: &DataFrame,
    ) -> Result<Vec<String>, ProcessorError> {
        let suburbs: HashSet<&str> = crime_totals
            .column(SUBURB)?
            .str()?
            .into_iter()
            .flatten()
            .collect();

        let mut missing: Vec<String> = census_regions
            .column(CENSUS_NAME)?
            .str()?
            .into_iter()
            .flatten()
            .filter(|name| !suburbs.contains(name))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing.dedup();
        Ok(missing)
    }

    /// Run the full pipeline on raw tables.
    ///
    /// `regions` is the unfiltered geography table and `crime` the raw crime rows.
    pub fn merge(
        census: &DataFrame,
        regions: &DataFrame,
        crime: &DataFrame,
    ) -> Result<(MergedTable, MergeReport), ProcessorError> {
        let sal_regions = Self::filter_sal(regions)?;
        let crime_totals = Self::aggregate_crime(crime)?;
        let by_code = Self::join_census_regions(census, &sal_regions)?;
        let merged = Self::join_crime(&by_code, &crime_totals)?;

        let report = MergeReport {
            census_rows: census.height(),
            sal_regions: sal_regions.height(),
            crime_suburbs: crime_totals.height(),
            code_matches: by_code.height(),
            merged_rows: merged.height(),
            unmatched_names: Self::unmatched_names(&by_code, &crime_totals)?,
        };

        Ok((MergedTable::new(merged), report))
    }

    /// Rows with the highest crime counts, descending; ties keep table order.
    pub fn top_by_crime(df: &DataFrame, n: usize) -> Result<DataFrame, ProcessorError> {
        let top = df
            .clone()
            .lazy()
            .sort(
                [CRIME_COUNT],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_nulls_last(true)
                    .with_maintain_order(true),
            )
            .limit(IdxSize::try_from(n).unwrap_or(IdxSize::MAX))
            .collect()?;
        Ok(top)
    }
}
