//! Final rendering stage.
//!
//! Rounds float columns, renders every remaining missing cell as the literal
//! "N/A", guards against the sentinel re-entering as text, and canonicalizes
//! the target label. After this stage every column is text and the table is
//! final.

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::schema::DAY_OF_WEEK_COLUMN;
use crate::utils::round_half_even_2dp;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

// textual variants of the missing sentinel: "na", "n/a", any case, padded
static NA_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*n/?a\s*$").expect("valid regex"));

const WEEKDAY_NAMES: [(&str, &str); 7] = [
    ("mon", "monday"),
    ("tue", "tuesday"),
    ("wed", "wednesday"),
    ("thu", "thursday"),
    ("fri", "friday"),
    ("sat", "saturday"),
    ("sun", "sunday"),
];

/// Render the table into its final, all-text form.
///
/// - Float columns are rounded half-to-even to 2 decimals and rendered with
///   exactly 2 decimal digits; columns excluded via `round_columns` render
///   at full precision.
/// - Missing cells render as the configured sentinel ("N/A").
/// - Text cells matching a case-insensitive "na"/"n/a" (or blank cells) are
///   normalized to the sentinel.
/// - The target is trimmed and lower-cased; anything but "yes"/"no"
///   collapses to the sentinel.
/// - Optionally, day_of_week abbreviations are expanded to full names first.
pub fn finalize(
    df: &mut DataFrame,
    config: &CleaningConfig,
    steps: &mut Vec<String>,
) -> Result<()> {
    if config.expand_weekday_names {
        expand_weekdays(df, steps)?;
    }

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for col_name in names {
        let series = df.column(&col_name)?.as_materialized_series().clone();

        let rendered = match series.dtype() {
            DataType::Float64 => {
                render_float(&series, config.rounds(&col_name), &config.missing_token)?
            }
            DataType::String if col_name == config.target_column => {
                canonicalize_target(&series, &config.missing_token)?
            }
            DataType::String => render_text(&series, &config.missing_token)?,
            _ => {
                // any stray dtype is rendered through its text form
                let cast = series.cast(&DataType::String)?;
                if col_name == config.target_column {
                    canonicalize_target(&cast, &config.missing_token)?
                } else {
                    render_text(&cast, &config.missing_token)?
                }
            }
        };

        df.replace(&col_name, rendered)?;
    }

    steps.push(format!(
        "Rendered final table: 2-decimal floats, '{}' missing markers",
        config.missing_token
    ));
    Ok(())
}

fn render_float(series: &Series, round: bool, missing_token: &str) -> PolarsResult<Series> {
    let values: Vec<String> = series
        .f64()?
        .into_iter()
        .map(|opt| match opt {
            Some(v) if round => format!("{:.2}", round_half_even_2dp(v)),
            Some(v) => format!("{}", v),
            None => missing_token.to_string(),
        })
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

fn render_text(series: &Series, missing_token: &str) -> PolarsResult<Series> {
    let values: Vec<String> = series
        .str()?
        .into_iter()
        .map(|opt| match opt {
            Some(raw) if NA_TOKEN.is_match(raw) || raw.trim().is_empty() => {
                missing_token.to_string()
            }
            Some(raw) => raw.to_string(),
            None => missing_token.to_string(),
        })
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

fn canonicalize_target(series: &Series, missing_token: &str) -> PolarsResult<Series> {
    let values: Vec<String> = series
        .str()?
        .into_iter()
        .map(|opt| match opt {
            Some(raw) => {
                let label = raw.trim().to_lowercase();
                if label == "yes" || label == "no" {
                    label
                } else {
                    missing_token.to_string()
                }
            }
            None => missing_token.to_string(),
        })
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

fn expand_weekdays(df: &mut DataFrame, steps: &mut Vec<String>) -> Result<()> {
    let Ok(col) = df.column(DAY_OF_WEEK_COLUMN) else {
        debug!("No '{}' column, skipping weekday expansion", DAY_OF_WEEK_COLUMN);
        return Ok(());
    };
    let series = col.as_materialized_series().clone();
    if series.dtype() != &DataType::String {
        return Ok(());
    }

    let expanded: Vec<Option<String>> = series
        .str()?
        .into_iter()
        .map(|opt| {
            opt.map(|raw| {
                WEEKDAY_NAMES
                    .iter()
                    .find(|(abbr, _)| *abbr == raw)
                    .map(|(_, full)| full.to_string())
                    .unwrap_or_else(|| raw.to_string())
            })
        })
        .collect();

    df.replace(
        DAY_OF_WEEK_COLUMN,
        Series::new(DAY_OF_WEEK_COLUMN.into(), expanded),
    )?;
    steps.push("Expanded day_of_week abbreviations to full names".to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(df: &mut DataFrame, config: &CleaningConfig) {
        let mut steps = Vec::new();
        finalize(df, config, &mut steps).unwrap();
    }

    fn text_at(df: &DataFrame, col: &str, idx: usize) -> String {
        let series = df.column(col).unwrap().as_materialized_series().clone();
        series.str().unwrap().get(idx).unwrap().to_string()
    }

    // ==================== float rendering tests ====================

    #[test]
    fn test_floats_rendered_with_two_decimals() {
        let mut df = df![
            "duration" => [Some(0.3333), Some(1.0), None],
        ]
        .unwrap();
        run(&mut df, &CleaningConfig::default());

        assert_eq!(text_at(&df, "duration", 0), "0.33");
        assert_eq!(text_at(&df, "duration", 1), "1.00");
        assert_eq!(text_at(&df, "duration", 2), "N/A");
    }

    #[test]
    fn test_negative_zero_renders_as_zero() {
        let mut df = df![
            "cons.conf.idx" => [-0.0001],
        ]
        .unwrap();
        run(&mut df, &CleaningConfig::default());

        assert_eq!(text_at(&df, "cons.conf.idx", 0), "0.00");
    }

    #[test]
    fn test_round_columns_subset() {
        let mut df = df![
            "duration" => [0.125],
            "age" => [30.125],
        ]
        .unwrap();
        let config = CleaningConfig::builder()
            .round_columns(Some(vec!["duration".to_string()]))
            .build()
            .unwrap();
        run(&mut df, &config);

        // duration rounded half-to-even, age rendered at full precision
        assert_eq!(text_at(&df, "duration", 0), "0.12");
        assert_eq!(text_at(&df, "age", 0), "30.125");
    }

    // ==================== text rendering tests ====================

    #[test]
    fn test_missing_and_na_text_normalized() {
        let mut df = df![
            "job" => [Some("admin."), None, Some("n/a"), Some(" NA "), Some("na"), Some("")],
        ]
        .unwrap();
        run(&mut df, &CleaningConfig::default());

        assert_eq!(text_at(&df, "job", 0), "admin.");
        assert_eq!(text_at(&df, "job", 1), "N/A");
        assert_eq!(text_at(&df, "job", 2), "N/A");
        assert_eq!(text_at(&df, "job", 3), "N/A");
        assert_eq!(text_at(&df, "job", 4), "N/A");
        assert_eq!(text_at(&df, "job", 5), "N/A");
    }

    #[test]
    fn test_ordinary_words_containing_na_kept() {
        let mut df = df![
            "job" => ["management", "nanny"],
        ]
        .unwrap();
        run(&mut df, &CleaningConfig::default());

        assert_eq!(text_at(&df, "job", 0), "management");
        assert_eq!(text_at(&df, "job", 1), "nanny");
    }

    // ==================== target tests ====================

    #[test]
    fn test_target_canonicalized_to_closed_set() {
        let mut df = df![
            "y" => [Some("yes"), Some(" NO "), Some("YES"), Some("maybe"), Some("unknown"), None],
        ]
        .unwrap();
        run(&mut df, &CleaningConfig::default());

        let rendered: Vec<String> = (0..6).map(|i| text_at(&df, "y", i)).collect();
        assert_eq!(rendered, vec!["yes", "no", "yes", "N/A", "N/A", "N/A"]);
    }

    // ==================== weekday expansion tests ====================

    #[test]
    fn test_weekday_expansion_disabled_by_default() {
        let mut df = df![
            "day_of_week" => ["mon", "fri"],
        ]
        .unwrap();
        run(&mut df, &CleaningConfig::default());

        assert_eq!(text_at(&df, "day_of_week", 0), "mon");
    }

    #[test]
    fn test_weekday_expansion() {
        let mut df = df![
            "day_of_week" => [Some("mon"), Some("thu"), Some("sun"), Some("holiday"), None],
        ]
        .unwrap();
        let config = CleaningConfig::builder()
            .expand_weekday_names(true)
            .build()
            .unwrap();
        run(&mut df, &config);

        assert_eq!(text_at(&df, "day_of_week", 0), "monday");
        assert_eq!(text_at(&df, "day_of_week", 1), "thursday");
        assert_eq!(text_at(&df, "day_of_week", 2), "sunday");
        // unrecognized values pass through, missing renders as N/A
        assert_eq!(text_at(&df, "day_of_week", 3), "holiday");
        assert_eq!(text_at(&df, "day_of_week", 4), "N/A");
    }

    // ==================== invariants ====================

    #[test]
    fn test_all_columns_text_after_finalize() {
        let mut df = df![
            "duration" => [Some(1.5), None],
            "job" => [Some("admin."), None],
            "y" => [Some("yes"), None],
        ]
        .unwrap();
        run(&mut df, &CleaningConfig::default());

        for col in df.get_columns() {
            assert_eq!(col.dtype(), &DataType::String);
        }
        assert_eq!(df.height(), 2);
    }
}
