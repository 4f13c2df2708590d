//! Statistics Calculator Module
//! Descriptive statistics and correlation between household income and crime.

use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

/// Significance threshold for the correlation test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Summary of the income vs crime relationship across merged suburbs.
#[derive(Debug, Clone)]
pub struct CorrelationSummary {
    pub count: usize,
    pub income_mean: f64,
    pub income_median: f64,
    pub crime_mean: f64,
    pub crime_median: f64,
    /// Pearson r; `None` when either variable is constant or n < 2
    pub pearson_r: Option<f64>,
    /// Two-tailed p-value for r; `None` when n < 3
    pub p_value: Option<f64>,
    pub is_significant: bool,
}

impl Default for CorrelationSummary {
    fn default() -> Self {
        Self {
            count: 0,
            income_mean: f64::NAN,
            income_median: f64::NAN,
            crime_mean: f64::NAN,
            crime_median: f64::NAN,
            pearson_r: None,
            p_value: None,
            is_significant: false,
        }
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarise `[income, crime]` points.
    pub fn income_crime_summary(points: &[[f64; 2]]) -> CorrelationSummary {
        let n = points.len();
        if n == 0 {
            return CorrelationSummary::default();
        }

        let income: Vec<f64> = points.iter().map(|p| p[0]).collect();
        let crime: Vec<f64> = points.iter().map(|p| p[1]).collect();

        let pearson_r = Self::pearson(&income, &crime);
        let p_value = pearson_r.and_then(|r| Self::correlation_p_value(r, n));

        CorrelationSummary {
            count: n,
            income_mean: income.iter().mean(),
            income_median: Self::median(&income),
            crime_mean: crime.iter().mean(),
            crime_median: Self::median(&crime),
            pearson_r,
            p_value,
            is_significant: p_value.is_some_and(|p| p <= SIGNIFICANCE_THRESHOLD),
        }
    }

    fn median(values: &[f64]) -> f64 {
        let n = values.len();
        if n == 0 {
            return f64::NAN;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    /// Sample Pearson correlation coefficient.
    pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
        if x.len() != y.len() || x.len() < 2 {
            return None;
        }

        let sx = x.iter().std_dev();
        let sy = y.iter().std_dev();
        if sx == 0.0 || sy == 0.0 || sx.is_nan() || sy.is_nan() {
            return None;
        }

        let r = x.iter().covariance(y.iter()) / (sx * sy);
        Some(r.clamp(-1.0, 1.0))
    }

    /// Two-tailed t-test of r against zero with n - 2 degrees of freedom.
    fn correlation_p_value(r: f64, n: usize) -> Option<f64> {
        if n < 3 {
            return None;
        }
        if r.abs() >= 1.0 {
            return Some(0.0);
        }

        let df = (n - 2) as f64;
        let t = r * (df / (1.0 - r * r)).sqrt();

        StudentsT::new(0.0, 1.0, df)
            .ok()
            .map(|dist| 2.0 * (1.0 - dist.cdf(t.abs())))
    }
}
