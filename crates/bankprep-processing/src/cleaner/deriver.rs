//! Education/year feature derivation.
//!
//! The survey encodes schooling as a composite category+duration string
//! ("basic.4y", "university.degree"). Splitting it yields two independently
//! usable features: the base category and the duration in years.

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::schema::insert_after;
use crate::utils::is_missing_token;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

// a duration segment: optional leading dot, the digit run, optional trailing 'y'
static DURATION_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.?\d+y?").expect("valid regex"));

/// Split the composite education field into a base category and a derived
/// year column.
///
/// - year = first run of decimal digits, as text; missing when there are none.
/// - education is rewritten with its duration segment stripped and every
///   remaining "." replaced by a space; an empty or sentinel remainder
///   becomes missing.
///
/// The year column is inserted immediately after education in the column
/// order. When the source column is absent the stage is skipped entirely and
/// no year column is created. Missingness of both columns is meaningful from
/// here on ("no duration encoded"), so the imputer leaves them alone.
pub fn derive_year(
    df: &mut DataFrame,
    config: &CleaningConfig,
    steps: &mut Vec<String>,
) -> Result<()> {
    let Some(derived) = &config.derived else {
        return Ok(());
    };

    let Ok(col) = df.column(&derived.source) else {
        debug!(
            "Source column '{}' absent, skipping derivation of '{}'",
            derived.source, derived.name
        );
        return Ok(());
    };

    let series = col.as_materialized_series().clone();
    if series.dtype() != &DataType::String {
        return Ok(());
    }

    let len = series.len();
    let mut years: Vec<Option<String>> = Vec::with_capacity(len);
    let mut bases: Vec<Option<String>> = Vec::with_capacity(len);
    let mut derived_count = 0usize;

    for opt in series.str()?.into_iter() {
        match opt {
            Some(text) => {
                let year = DIGIT_RUN.find(text).map(|m| m.as_str().to_string());
                if year.is_some() {
                    derived_count += 1;
                }
                years.push(year);

                let stripped = DURATION_SEGMENT.replace_all(text, "");
                let base = stripped.replace('.', " ").trim().to_string();
                if is_missing_token(&base) {
                    bases.push(None);
                } else {
                    bases.push(Some(base));
                }
            }
            None => {
                years.push(None);
                bases.push(None);
            }
        }
    }

    df.replace(
        &derived.source,
        Series::new(derived.source.as_str().into(), bases),
    )?;
    df.with_column(Series::new(derived.name.as_str().into(), years))?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let order = insert_after(&names, &derived.source, &derived.name);
    *df = df.select(order)?;

    steps.push(format!(
        "Derived '{}' from '{}': {} of {} rows carried a duration",
        derived.name, derived.source, derived_count, len
    ));
    Ok(())
}
