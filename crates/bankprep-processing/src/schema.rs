//! The fixed bank-marketing survey schema and column-order operations.
//!
//! Column roles are static configuration, never inferred from the data. The
//! constants here feed [`CleaningConfig::default`](crate::CleaningConfig),
//! which is the single source of truth a pipeline run works from.

use crate::config::CleaningConfig;
use crate::error::{CleaningError, Result};
use polars::prelude::*;
use tracing::debug;

/// Declared output schema, in output order.
pub const KEEP_COLUMNS: [&str; 21] = [
    "age",
    "job",
    "marital",
    "education",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "day_of_week",
    "duration",
    "campaign",
    "pdays",
    "previous",
    "poutcome",
    "emp.var.rate",
    "cons.price.idx",
    "cons.conf.idx",
    "euribor3m",
    "nr.employed",
    "y",
];

/// Columns carrying numeric measurements.
pub const NUMERIC_COLUMNS: [&str; 10] = [
    "age",
    "duration",
    "campaign",
    "pdays",
    "previous",
    "emp.var.rate",
    "cons.price.idx",
    "cons.conf.idx",
    "euribor3m",
    "nr.employed",
];

/// The binary subscription outcome.
pub const TARGET_COLUMN: &str = "y";

/// Composite schooling field, split by the deriver.
pub const EDUCATION_COLUMN: &str = "education";

/// Schooling duration derived out of [`EDUCATION_COLUMN`].
pub const YEAR_COLUMN: &str = "year";

/// Weekday abbreviation column, optionally expanded by the formatter.
pub const DAY_OF_WEEK_COLUMN: &str = "day_of_week";

/// "Never previously contacted" encoding in the pdays column.
pub const PDAYS_COLUMN: &str = "pdays";
pub const PDAYS_SENTINEL: f64 = 999.0;

/// Role of a column within the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Parsed to floating point, imputed by median, capped, possibly scaled.
    Numeric,
    /// Normalized text, imputed by mode.
    Categorical,
    /// The label column; normalized but never imputed.
    Target,
}

/// Restrict a raw table to the declared column set, in declared order.
///
/// Declared columns absent from the input are silently omitted; extra input
/// columns are dropped. Rows are never reordered. An input sharing no column
/// at all with the declared schema is rejected as malformed.
pub fn project(
    df: &DataFrame,
    config: &CleaningConfig,
    steps: &mut Vec<String>,
) -> Result<DataFrame> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let keep: Vec<String> = config
        .keep_columns
        .iter()
        .filter(|c| present.iter().any(|p| p == *c))
        .cloned()
        .collect();

    let omitted: Vec<&String> = config
        .keep_columns
        .iter()
        .filter(|c| !present.iter().any(|p| p == *c))
        .collect();
    if !omitted.is_empty() {
        debug!("Declared columns absent from input: {:?}", omitted);
    }

    if keep.is_empty() {
        return Err(CleaningError::MalformedInput(
            "input shares no column with the declared schema".to_string(),
        ));
    }

    let dropped = df.width() - keep.len();
    let projected = df.select(keep.clone())?;

    steps.push(format!(
        "Projected schema: kept {} columns, dropped {} undeclared, {} declared absent",
        keep.len(),
        dropped,
        omitted.len()
    ));
    Ok(projected)
}

/// Ordered-column-list transformation: place `inserted` immediately after
/// `anchor`, or append it at the end when the anchor is absent.
///
/// Any previous position of `inserted` in the list is discarded first.
pub fn insert_after(names: &[String], anchor: &str, inserted: &str) -> Vec<String> {
    let mut out: Vec<String> = names
        .iter()
        .filter(|n| n.as_str() != inserted)
        .cloned()
        .collect();
    match out.iter().position(|n| n == anchor) {
        Some(i) => out.insert(i + 1, inserted.to_string()),
        None => out.push(inserted.to_string()),
    }
    out
}
