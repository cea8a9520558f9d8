//! Min-max scaling.

use crate::config::CleaningConfig;
use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Rescales numeric columns into `[0, 1]` using each column's own observed
/// minimum and maximum.
///
/// Columns listed in `scale_exclude` keep their raw values (age by
/// default). Degenerate columns — empty, all-null, or constant — become
/// exactly 0.0 in every row rather than producing an undefined ratio.
pub struct MinMaxScaler;

impl MinMaxScaler {
    /// Scale every eligible numeric column.
    pub fn scale(
        df: &mut DataFrame,
        config: &CleaningConfig,
        steps: &mut Vec<String>,
    ) -> Result<()> {
        for col_name in config.numeric_columns_in(df) {
            if !config.is_scaled(&col_name) {
                debug!("'{}' excluded from scaling", col_name);
                continue;
            }

            let series = df.column(&col_name)?.as_materialized_series().clone();
            if series.dtype() != &DataType::Float64 {
                continue;
            }

            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for v in series.f64()?.into_iter().flatten() {
                min = min.min(v);
                max = max.max(v);
            }

            let scaled = if !min.is_finite() || !max.is_finite() || min == max {
                // defined fallback, not an error
                steps.push(format!(
                    "Degenerate range in '{}', scaled entire column to 0.0",
                    col_name
                ));
                Series::new(col_name.as_str().into(), vec![0.0f64; series.len()])
            } else {
                let range = max - min;
                steps.push(format!(
                    "Scaled '{}' from [{:.2}, {:.2}] into [0, 1]",
                    col_name, min, max
                ));
                series
                    .f64()?
                    .apply(|v| v.map(|x| (x - min) / range))
                    .into_series()
            };

            df.replace(&col_name, scaled)?;
        }
        Ok(())
    }
}
