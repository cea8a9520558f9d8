//! Token normalization for categorical columns.

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::utils::is_missing_token;
use polars::prelude::*;
use tracing::debug;

/// Trim and lower-case every categorical text cell, demoting sentinel
/// tokens to missing.
///
/// A cell becomes missing when the normalized text is empty or one of
/// "nan", "none", "nat", "unknown". Numeric columns and the target column
/// are never touched; non-text columns are skipped. Idempotent: re-running
/// over an already-normalized table is a no-op.
pub fn normalize_categoricals(
    df: &mut DataFrame,
    config: &CleaningConfig,
    steps: &mut Vec<String>,
) -> Result<()> {
    let mut cleared_total = 0usize;

    for col_name in config.categorical_columns_in(df) {
        let series = df.column(&col_name)?.as_materialized_series().clone();
        if series.dtype() != &DataType::String {
            continue;
        }

        let mut cleared = 0usize;
        let normalized: Vec<Option<String>> = series
            .str()?
            .into_iter()
            .map(|opt| {
                opt.and_then(|raw| {
                    let token = raw.trim().to_lowercase();
                    if is_missing_token(&token) {
                        cleared += 1;
                        None
                    } else {
                        Some(token)
                    }
                })
            })
            .collect();

        df.replace(
            &col_name,
            Series::new(col_name.as_str().into(), normalized),
        )?;
        if cleared > 0 {
            debug!("Normalized '{}': {} sentinel values cleared", col_name, cleared);
            cleared_total += cleared;
        }
    }

    steps.push(format!(
        "Normalized categorical tokens: {} sentinel values demoted to missing",
        cleared_total
    ));
    Ok(())
}
