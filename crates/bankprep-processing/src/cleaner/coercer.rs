//! Numeric type coercion and sentinel demotion.

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::utils::parse_numeric_string;
use polars::prelude::*;
use tracing::debug;

/// Parse every numeric column to `Float64`.
///
/// Text cells are trimmed and parsed; cells that fail to parse (or parse to
/// a non-finite value) become missing — never an error. Columns that are
/// already numeric are cast. Afterwards, configured sentinel values (pdays
/// 999 by default) are demoted to missing so they cannot skew the medians
/// and ranges computed downstream.
pub fn coerce_numeric(
    df: &mut DataFrame,
    config: &CleaningConfig,
    steps: &mut Vec<String>,
) -> Result<()> {
    for col_name in config.numeric_columns_in(df) {
        let series = df.column(&col_name)?.as_materialized_series().clone();
        let nulls_before = series.null_count();

        let parsed = match series.dtype() {
            DataType::String => {
                let values: Vec<Option<f64>> = series
                    .str()?
                    .into_iter()
                    .map(|opt| opt.and_then(parse_numeric_string))
                    .collect();
                Series::new(col_name.as_str().into(), values)
            }
            _ => {
                let cast = series.cast(&DataType::Float64)?;
                cast.f64()?
                    .apply(|v| v.filter(|x| x.is_finite()))
                    .into_series()
            }
        };

        let failures = parsed.null_count().saturating_sub(nulls_before);
        df.replace(&col_name, parsed)?;
        if failures > 0 {
            steps.push(format!(
                "Coerced '{}' to numeric: {} unparseable cells set missing",
                col_name, failures
            ));
        } else {
            debug!("Coerced '{}' to numeric", col_name);
        }
    }

    for sentinel in &config.numeric_sentinels {
        let Ok(col) = df.column(&sentinel.column) else {
            continue;
        };
        let series = col.as_materialized_series().clone();
        if series.dtype() != &DataType::Float64 {
            continue;
        }

        let value = sentinel.value;
        let demoted_count = series
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| *v == value)
            .count();
        if demoted_count == 0 {
            continue;
        }

        let demoted = series
            .f64()?
            .apply(|v| v.filter(|x| *x != value))
            .into_series();
        df.replace(&sentinel.column, demoted)?;

        steps.push(format!(
            "Demoted sentinel {} in '{}': {} cells set missing",
            sentinel.value, sentinel.column, demoted_count
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(df: &mut DataFrame) -> Vec<String> {
        let mut steps = Vec::new();
        coerce_numeric(df, &CleaningConfig::default(), &mut steps).unwrap();
        steps
    }

    fn float_at(df: &DataFrame, col: &str, idx: usize) -> Option<f64> {
        let series = df.column(col).unwrap().as_materialized_series().clone();
        series.f64().unwrap().get(idx)
    }

    // ==================== parsing tests ====================

    #[test]
    fn test_parses_text_cells() {
        let mut df = df![
            "duration" => ["100", " 250 ", "-1.8"],
        ]
        .unwrap();
        run(&mut df);

        assert_eq!(float_at(&df, "duration", 0), Some(100.0));
        assert_eq!(float_at(&df, "duration", 1), Some(250.0));
        assert_eq!(float_at(&df, "duration", 2), Some(-1.8));
    }

    #[test]
    fn test_unparseable_cells_become_missing() {
        let mut df = df![
            "campaign" => [Some("2"), Some("abc"), Some(""), None, Some("nan")],
        ]
        .unwrap();
        let steps = run(&mut df);

        let campaign = df.column("campaign").unwrap();
        assert_eq!(campaign.null_count(), 4);
        assert_eq!(float_at(&df, "campaign", 0), Some(2.0));
        assert!(steps.iter().any(|s| s.contains("unparseable")));
    }

    #[test]
    fn test_integer_columns_are_cast() {
        let mut df = df![
            "previous" => [0i64, 1, 2],
        ]
        .unwrap();
        run(&mut df);

        let previous = df.column("previous").unwrap();
        assert_eq!(previous.dtype(), &DataType::Float64);
        assert_eq!(float_at(&df, "previous", 2), Some(2.0));
    }

    #[test]
    fn test_categorical_columns_untouched() {
        let mut df = df![
            "job" => ["admin.", "services"],
        ]
        .unwrap();
        run(&mut df);

        assert_eq!(df.column("job").unwrap().dtype(), &DataType::String);
    }

    // ==================== sentinel tests ====================

    #[test]
    fn test_pdays_999_demoted_to_missing() {
        let mut df = df![
            "pdays" => ["999", "3", "6", "999", "0"],
        ]
        .unwrap();
        let steps = run(&mut df);

        let pdays = df.column("pdays").unwrap();
        assert_eq!(pdays.null_count(), 2);
        assert_eq!(float_at(&df, "pdays", 1), Some(3.0));
        assert!(steps.iter().any(|s| s.contains("Demoted sentinel 999")));
    }

    #[test]
    fn test_sentinel_only_applies_to_configured_column() {
        let mut df = df![
            "duration" => ["999", "100"],
        ]
        .unwrap();
        run(&mut df);

        assert_eq!(float_at(&df, "duration", 0), Some(999.0));
    }

    #[test]
    fn test_row_count_unchanged() {
        let mut df = df![
            "pdays" => ["999", "abc", "5"],
        ]
        .unwrap();
        run(&mut df);
        assert_eq!(df.height(), 3);
    }
}
