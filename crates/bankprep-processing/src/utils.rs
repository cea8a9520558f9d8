//! Shared helpers for the cleaning pipeline.
//!
//! Common value-level predicates, parsing, and series transformations used
//! across multiple stages.

use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Missing-value vocabulary
// =============================================================================

/// The literal rendered for a missing cell in the final output.
pub const MISSING_SENTINEL: &str = "N/A";

/// Tokens that encode a missing value in the raw survey extract.
pub const MISSING_TOKENS: [&str; 4] = ["nan", "none", "nat", "unknown"];

/// Check if a string (after trimming and lower-casing) encodes a missing value.
///
/// The empty string counts as missing.
pub fn is_missing_token(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.is_empty() || MISSING_TOKENS.iter().any(|&t| t == lower)
}

// =============================================================================
// Numeric parsing
// =============================================================================

/// Try to parse a string cell as a finite floating-point number.
///
/// Surrounding whitespace is ignored. Anything that does not parse, or that
/// parses to a non-finite value (the textual "nan"/"inf" family), yields
/// `None` so the caller can demote the cell to missing.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Quantiles
// =============================================================================

/// Linear-interpolation quantile over an ascending-sorted slice.
///
/// `q` is in `[0, 1]`; returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64))
}

/// Collect the non-null values of a float column, ascending-sorted.
pub fn sorted_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let mut values: Vec<f64> = series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    values.sort_by(f64::total_cmp);
    Ok(values)
}

// =============================================================================
// Rounding
// =============================================================================

/// Round to 2 decimal places, ties to even; negative zero collapses to zero.
pub fn round_half_even_2dp(v: f64) -> f64 {
    let r = (v * 100.0).round_ties_even() / 100.0;
    if r == 0.0 { 0.0 } else { r }
}

// =============================================================================
// Series statistics
// =============================================================================

/// Most frequent value of a string series, ties broken by first occurrence.
///
/// Scanning is in row order, so repeated runs over the same table pick the
/// same winner. Returns `None` when the series has no non-null values.
pub fn string_mode_first(series: &Series) -> Option<String> {
    let ca = series.str().ok()?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for val in ca.into_iter().flatten() {
        let count = counts.entry(val).or_insert(0);
        if *count == 0 {
            order.push(val);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for val in order {
        let count = counts[val];
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((val, count));
        }
    }
    best.map(|(val, _)| val.to_string())
}

// =============================================================================
// Series transformations
// =============================================================================

/// Fill null values in a float series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let filled = series.f64()?.apply(|v| v.or(Some(fill_value)));
    Ok(filled.into_series())
}

/// Fill null values in a string series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<String> = series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value).to_string())
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== is_missing_token tests ====================

    #[test]
    fn test_is_missing_token() {
        assert!(is_missing_token("unknown"));
        assert!(is_missing_token("  UNKNOWN  "));
        assert!(is_missing_token("nan"));
        assert!(is_missing_token("None"));
        assert!(is_missing_token("NaT"));
        assert!(is_missing_token(""));
        assert!(is_missing_token("   "));
        assert!(!is_missing_token("basic"));
        assert!(!is_missing_token("no"));
    }

    // ==================== parse_numeric_string tests ====================

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!(parse_numeric_string("42"), Some(42.0));
        assert_eq!(parse_numeric_string("  -1.8 "), Some(-1.8));
        assert_eq!(parse_numeric_string("999"), Some(999.0));
        assert_eq!(parse_numeric_string(""), None);
        assert_eq!(parse_numeric_string("admin."), None);
        assert_eq!(parse_numeric_string("nan"), None);
        assert_eq!(parse_numeric_string("inf"), None);
    }

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_sorted_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&values, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&values, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&values, 0.75), Some(3.25));
        assert_eq!(quantile_sorted(&values, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&values, 1.0), Some(4.0));
    }

    #[test]
    fn test_quantile_sorted_exact_index() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&values, 0.5), Some(3.0));
    }

    #[test]
    fn test_quantile_sorted_single_and_empty() {
        assert_eq!(quantile_sorted(&[7.0], 0.25), Some(7.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    // ==================== rounding tests ====================

    #[test]
    fn test_round_half_even_2dp() {
        assert_eq!(round_half_even_2dp(1.234), 1.23);
        assert_eq!(round_half_even_2dp(1.236), 1.24);
        // exact binary ties go to the even neighbour
        assert_eq!(round_half_even_2dp(0.125), 0.12);
        assert_eq!(round_half_even_2dp(0.375), 0.38);
    }

    #[test]
    fn test_round_negative_zero_collapses() {
        let r = round_half_even_2dp(-0.001);
        assert_eq!(r, 0.0);
        assert_eq!(format!("{:.2}", r), "0.00");
    }

    // ==================== string_mode_first tests ====================

    #[test]
    fn test_string_mode_first_basic() {
        let series = Series::new("job".into(), &["admin.", "services", "admin.", "admin."]);
        assert_eq!(string_mode_first(&series), Some("admin.".to_string()));
    }

    #[test]
    fn test_string_mode_first_tie_breaks_by_first_occurrence() {
        let series = Series::new(
            "job".into(),
            &[Some("services"), Some("admin."), Some("admin."), Some("services"), None],
        );
        // both appear twice; "services" was seen first
        assert_eq!(string_mode_first(&series), Some("services".to_string()));
    }

    #[test]
    fn test_string_mode_first_all_null() {
        let series = Series::new("job".into(), &[Option::<&str>::None, None]);
        assert_eq!(string_mode_first(&series), None);
    }

    // ==================== fill helpers tests ====================

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("age".into(), &[Some(30.0), None, Some(45.0)]);
        let filled = fill_numeric_nulls(&series, 38.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.f64().unwrap().get(1), Some(38.0));
        assert_eq!(filled.name().as_str(), "age");
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("job".into(), &[Some("admin."), None]);
        let filled = fill_string_nulls(&series, "N/A").unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.str().unwrap().get(1), Some("N/A"));
    }

    // ==================== sorted_values tests ====================

    #[test]
    fn test_sorted_values_drops_nulls_and_sorts() {
        let series = Series::new("v".into(), &[Some(3.0), None, Some(1.0), Some(2.0)]);
        assert_eq!(sorted_values(&series).unwrap(), vec![1.0, 2.0, 3.0]);
    }
}
