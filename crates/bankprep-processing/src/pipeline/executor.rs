//! The cleaning pipeline orchestrator.
//!
//! Owns the table exclusively and passes it through the fixed stage order:
//! projection, normalization, derivation, coercion, imputation, capping,
//! scaling, formatting. Stages borrow the table mutably and retain nothing;
//! no stage may change the row count.

use crate::cleaner::{coerce_numeric, derive_year, finalize, normalize_categoricals};
use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result};
use crate::imputers::StatisticalImputer;
use crate::pipeline::outliers::OutlierCapper;
use crate::pipeline::scaler::MinMaxScaler;
use crate::schema;
use polars::prelude::*;
use tracing::{debug, info};

/// Result of a pipeline run: the finalized table plus the audit log of
/// processing steps.
#[derive(Debug)]
pub struct CleaningOutcome {
    /// The cleaned table, all columns rendered as text, ready to serialize.
    pub data: DataFrame,
    /// Human-readable description of every step applied, in order.
    pub steps: Vec<String>,
}

/// The deterministic cleaning pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use bankprep_processing::{CleaningConfig, Pipeline};
///
/// let pipeline = Pipeline::new(CleaningConfig::default())?;
/// let outcome = pipeline.process(raw_table)?;
/// println!("{} steps applied", outcome.steps.len());
/// ```
pub struct Pipeline {
    config: CleaningConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: CleaningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run the full cleaning pipeline over a raw table.
    ///
    /// Consumes the raw table and returns the finalized one; the output row
    /// count always equals the input row count.
    pub fn process(&self, df: DataFrame) -> Result<CleaningOutcome> {
        let rows = df.height();
        let mut steps = Vec::new();

        info!(
            "Starting cleaning pipeline: {} rows x {} columns",
            rows,
            df.width()
        );

        let mut df = schema::project(&df, &self.config, &mut steps)?;
        debug!("Projected to {} columns", df.width());

        normalize_categoricals(&mut df, &self.config, &mut steps)?;
        derive_year(&mut df, &self.config, &mut steps)?;
        coerce_numeric(&mut df, &self.config, &mut steps)?;
        StatisticalImputer::impute(&mut df, &self.config, &mut steps)?;
        OutlierCapper::cap_numeric(&mut df, &self.config, &mut steps)?;
        MinMaxScaler::scale(&mut df, &self.config, &mut steps)?;
        finalize(&mut df, &self.config, &mut steps)?;

        if df.height() != rows {
            return Err(CleaningError::RowCountChanged {
                before: rows,
                after: df.height(),
            });
        }

        info!(
            "Cleaning complete: {} rows x {} columns, {} steps",
            df.height(),
            df.width(),
            steps.len()
        );
        Ok(CleaningOutcome { data: df, steps })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: CleaningConfig::default(),
        }
    }
}
