//! Statistical imputation: column median for numerics, column mode for
//! categoricals.

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::utils::{fill_numeric_nulls, fill_string_nulls, quantile_sorted, sorted_values, string_mode_first};
use polars::prelude::*;
use tracing::debug;

/// Fills missing values with per-column statistics.
///
/// Numeric columns take their median, computed once over the coerced values
/// before any capping. Categorical columns take their most frequent value,
/// ties broken by first occurrence in row order so repeated runs are
/// bit-identical. The target column and the derived education/year pair are
/// never imputed; their missingness is meaningful and flows through to the
/// formatter.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Impute every eligible column of the table.
    pub fn impute(
        df: &mut DataFrame,
        config: &CleaningConfig,
        steps: &mut Vec<String>,
    ) -> Result<()> {
        for col_name in config.numeric_columns_in(df) {
            Self::fill_numeric_median(df, &col_name, steps)?;
        }

        for col_name in config.categorical_columns_in(df) {
            if config.impute_exempt(&col_name) {
                continue;
            }
            Self::fill_categorical_mode(df, &col_name, &config.missing_token, steps)?;
        }

        Ok(())
    }

    /// Fill a numeric column's nulls with its median.
    ///
    /// A column with no non-null values is left unchanged.
    pub fn fill_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if series.dtype() != &DataType::Float64 || series.null_count() == 0 {
            return Ok(());
        }

        let values = sorted_values(&series)?;
        let Some(median) = quantile_sorted(&values, 0.5) else {
            debug!("'{}' has no observed values, leaving missing", col_name);
            return Ok(());
        };

        let filled = fill_numeric_nulls(&series, median)?;
        df.replace(col_name, filled)?;
        steps.push(format!(
            "Filled '{}' with median: {:.2}",
            col_name, median
        ));
        Ok(())
    }

    /// Fill a categorical column's nulls with its mode, or with the missing
    /// sentinel when the column has no observed values at all.
    pub fn fill_categorical_mode(
        df: &mut DataFrame,
        col_name: &str,
        missing_token: &str,
        steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        if series.dtype() != &DataType::String || series.null_count() == 0 {
            return Ok(());
        }

        match string_mode_first(&series) {
            Some(mode) => {
                let filled = fill_string_nulls(&series, &mode)?;
                df.replace(col_name, filled)?;
                steps.push(format!("Filled '{}' with mode: '{}'", col_name, mode));
            }
            None => {
                let filled = fill_string_nulls(&series, missing_token)?;
                df.replace(col_name, filled)?;
                steps.push(format!(
                    "'{}' has no observed values, filled with '{}'",
                    col_name, missing_token
                ));
            }
        }
        Ok(())
    }
}
