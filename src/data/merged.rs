//! Merged census, geography and crime table.

use super::columns::*;
use super::processor::{DataProcessor, ProcessorError};
use polars::prelude::*;

/// Crime total for one suburb.
#[derive(Debug, Clone, PartialEq)]
pub struct SuburbCrime {
    pub suburb: String,
    pub crime_count: f64,
}

/// Read-only result of the load/merge pipeline.
#[derive(Debug, Clone)]
pub struct MergedTable {
    df: DataFrame,
}

impl MergedTable {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// `[income, crime]` pairs for every row where both values are present.
    pub fn income_vs_crime(&self) -> Result<Vec<[f64; 2]>, ProcessorError> {
        let income = self.df.column(MEDIAN_INCOME)?.cast(&DataType::Float64)?;
        let crime = self.df.column(CRIME_COUNT)?.cast(&DataType::Float64)?;

        let points = income
            .f64()?
            .into_iter()
            .zip(crime.f64()?.into_iter())
            .filter_map(|(x, y)| Some([x?, y?]))
            .collect();
        Ok(points)
    }

    /// At most `n` suburbs ordered by crime count, highest first.
    pub fn top_suburbs_by_crime(&self, n: usize) -> Result<Vec<SuburbCrime>, ProcessorError> {
        let top = DataProcessor::top_by_crime(&self.df, n)?;
        let counts = top.column(CRIME_COUNT)?.cast(&DataType::Float64)?;

        let suburbs = top
            .column(CENSUS_NAME)?
            .str()?
            .into_iter()
            .zip(counts.f64()?.into_iter())
            .filter_map(|(name, count)| {
                Some(SuburbCrime {
                    suburb: name?.to_string(),
                    crime_count: count?,
                })
            })
            .collect();
        Ok(suburbs)
    }
}
