//! IQR outlier capping.

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::utils::{quantile_sorted, sorted_values};
use polars::prelude::*;
use tracing::debug;

/// Clamps numeric columns into their IQR-derived range.
///
/// Runs strictly after imputation, so the quartiles already include the
/// medians just inserted, and strictly before scaling, so scaling ranges
/// reflect the capped extremes. Values are clamped, never removed.
pub struct OutlierCapper;

impl OutlierCapper {
    /// Cap every numeric column to `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
    ///
    /// Quartiles use the standard linear-interpolation method over the
    /// sorted non-null values. All-null columns are left unchanged.
    pub fn cap_numeric(
        df: &mut DataFrame,
        config: &CleaningConfig,
        steps: &mut Vec<String>,
    ) -> Result<()> {
        for col_name in config.numeric_columns_in(df) {
            let series = df.column(&col_name)?.as_materialized_series().clone();
            if series.dtype() != &DataType::Float64 {
                continue;
            }

            let values = sorted_values(&series)?;
            let (Some(q1), Some(q3)) = (
                quantile_sorted(&values, 0.25),
                quantile_sorted(&values, 0.75),
            ) else {
                debug!("'{}' has no observed values, skipping capping", col_name);
                continue;
            };

            let iqr = q3 - q1;
            let lower = q1 - 1.5 * iqr;
            let upper = q3 + 1.5 * iqr;

            let capped_count = series
                .f64()?
                .into_iter()
                .flatten()
                .filter(|v| *v < lower || *v > upper)
                .count();

            let capped = series
                .f64()?
                .apply(|v| v.map(|x| x.clamp(lower, upper)))
                .into_series();
            df.replace(&col_name, capped)?;

            if capped_count > 0 {
                steps.push(format!(
                    "Capped {} outliers in '{}' to [{:.2}, {:.2}]",
                    capped_count, col_name, lower, upper
                ));
            } else {
                debug!("No outliers in '{}' ({:.2}..{:.2})", col_name, lower, upper);
            }
        }
        Ok(())
    }
}
