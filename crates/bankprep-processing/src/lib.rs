//! Deterministic cleaning pipeline for the bank telemarketing survey extract.
//!
//! # Overview
//!
//! The crate turns a raw, semicolon-delimited survey extract into a cleaned,
//! comma-delimited, analysis-ready table. One fixed sequence of
//! column-scoped stages runs over a single in-memory table:
//!
//! 1. **Schema projection** — restrict to the declared column set
//! 2. **Token normalization** — trim/lower-case categoricals, demote
//!    sentinel tokens ("unknown", "nan", ...) to missing
//! 3. **Feature derivation** — split the composite education field into a
//!    base category and a year column
//! 4. **Type coercion** — parse numerics, demote the pdays 999 sentinel
//! 5. **Imputation** — column median for numerics, column mode for
//!    categoricals (deterministic tie-break)
//! 6. **Outlier capping** — clamp numerics into their IQR-derived range
//! 7. **Min-max scaling** — rescale into `[0, 1]`, age excluded by default
//! 8. **Formatting** — round to 2 decimals, render missing as "N/A",
//!    canonicalize the target to {"yes", "no", "N/A"}
//!
//! Every point of variance between the historical script variants is an
//! explicit [`CleaningConfig`] field rather than a separate implementation:
//! `scale_exclude`, `expand_weekday_names`, `round_columns`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bankprep_processing::{io, CleaningConfig, Pipeline, SurveyProfiler};
//!
//! // Profile the raw extract (read-only, independent of the pipeline)
//! let raw = io::load_survey_extract("bank-additional-full.csv")?;
//! let profile = SurveyProfiler::profile(&raw, &CleaningConfig::default())?;
//! println!("{}", profile.render());
//!
//! // Clean it
//! let pipeline = Pipeline::new(CleaningConfig::default())?;
//! let mut outcome = pipeline.process(raw)?;
//! io::write_cleaned_table(&mut outcome.data, "bank_cleaned.csv")?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod schema;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, DerivedColumn, NumericSentinel,
};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{CleaningOutcome, MinMaxScaler, OutlierCapper, Pipeline};
pub use profiler::{ColumnSummary, NumericSummary, SurveyProfile, SurveyProfiler, TargetLabel};
pub use schema::ColumnRole;
pub use utils::{
    MISSING_SENTINEL, MISSING_TOKENS, is_missing_token, parse_numeric_string, quantile_sorted,
    round_half_even_2dp, string_mode_first,
};
