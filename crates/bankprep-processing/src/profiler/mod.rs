//! Raw-extract profiling.
//!
//! A read-only collaborator that consumes the same raw input as the
//! pipeline and emits human-readable diagnostics: shape, per-column
//! missing/"unknown" counts, numeric summaries, target distribution, and a
//! correlation matrix. It never writes to the pipeline's table and is not a
//! pipeline stage.

mod statistics;

use crate::config::CleaningConfig;
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;

use statistics::{count_unknown, mean_std, numeric_values, pearson};

/// Per-column missing and sentinel counts.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
    pub unknown_count: usize,
}

/// Describe-style statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// One target label with its frequency.
#[derive(Debug, Clone, Serialize)]
pub struct TargetLabel {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Full diagnostic profile of a raw survey extract.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyProfile {
    pub rows: usize,
    pub columns: usize,
    pub column_summaries: Vec<ColumnSummary>,
    pub numeric_summaries: Vec<NumericSummary>,
    pub target_column: String,
    pub target_distribution: Vec<TargetLabel>,
    pub correlation_columns: Vec<String>,
    /// Row-major Pearson matrix; `None` marks an undefined coefficient
    /// (constant column or too few complete pairs).
    pub correlation: Vec<Vec<Option<f64>>>,
}

/// Builds a [`SurveyProfile`] from a raw table.
pub struct SurveyProfiler;

impl SurveyProfiler {
    /// Profile a raw table under the given schema configuration.
    pub fn profile(df: &DataFrame, config: &CleaningConfig) -> Result<SurveyProfile> {
        let mut column_summaries = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let series = col.as_materialized_series();
            column_summaries.push(ColumnSummary {
                name: series.name().to_string(),
                dtype: format!("{}", series.dtype()),
                null_count: series.null_count(),
                unknown_count: count_unknown(series),
            });
        }

        let numeric_names = config.numeric_columns_in(df);
        let mut numeric_summaries = Vec::with_capacity(numeric_names.len());
        let mut numeric_columns = Vec::with_capacity(numeric_names.len());
        for name in &numeric_names {
            let series = df.column(name)?.as_materialized_series();
            let values = numeric_values(series)?;
            let observed: Vec<f64> = values.iter().flatten().copied().collect();

            let (mean, std) = mean_std(&observed);
            let min = observed.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = observed.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            numeric_summaries.push(NumericSummary {
                name: name.clone(),
                count: observed.len(),
                mean,
                std,
                min: if min.is_finite() { min } else { 0.0 },
                max: if max.is_finite() { max } else { 0.0 },
            });
            numeric_columns.push(values);
        }

        let mut correlation = Vec::with_capacity(numeric_columns.len());
        for xs in &numeric_columns {
            let mut row = Vec::with_capacity(numeric_columns.len());
            for ys in &numeric_columns {
                row.push(pearson(xs, ys));
            }
            correlation.push(row);
        }

        let target_distribution = Self::target_distribution(df, &config.target_column)?;

        Ok(SurveyProfile {
            rows: df.height(),
            columns: df.width(),
            column_summaries,
            numeric_summaries,
            target_column: config.target_column.clone(),
            target_distribution,
            correlation_columns: numeric_names,
            correlation,
        })
    }

    fn target_distribution(df: &DataFrame, target: &str) -> Result<Vec<TargetLabel>> {
        let Ok(col) = df.column(target) else {
            return Ok(Vec::new());
        };
        let series = col.as_materialized_series();
        let Ok(ca) = series.str() else {
            return Ok(Vec::new());
        };

        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut total = 0usize;
        for value in ca.into_iter().flatten() {
            total += 1;
            match counts.iter_mut().find(|(label, _)| label == value) {
                Some((_, count)) => *count += 1,
                None => counts.push((value.to_string(), 1)),
            }
        }

        // highest count first, ties alphabetical, so output is stable
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(counts
            .into_iter()
            .map(|(label, count)| TargetLabel {
                percentage: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64 * 100.0
                },
                label,
                count,
            })
            .collect())
    }
}

impl SurveyProfile {
    /// Render the profile as human-readable diagnostic text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(40);

        let _ = writeln!(out, "{}", "=".repeat(80));
        let _ = writeln!(out, "SURVEY EXTRACT PROFILE");
        let _ = writeln!(
            out,
            "Generated: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "{}", "=".repeat(80));
        let _ = writeln!(out);

        let _ = writeln!(out, "SHAPE");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "  Rows:    {}", self.rows);
        let _ = writeln!(out, "  Columns: {}", self.columns);
        let _ = writeln!(out);

        let _ = writeln!(out, "MISSING / UNKNOWN VALUES");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "  {:<16} {:>8} {:>10}", "Column", "Missing", "Unknown");
        for col in &self.column_summaries {
            let _ = writeln!(
                out,
                "  {:<16} {:>8} {:>10}",
                truncate(&col.name, 16),
                col.null_count,
                col.unknown_count
            );
        }
        let _ = writeln!(out);

        if !self.numeric_summaries.is_empty() {
            let _ = writeln!(out, "NUMERIC SUMMARIES");
            let _ = writeln!(out, "{rule}");
            let _ = writeln!(
                out,
                "  {:<16} {:>7} {:>10} {:>10} {:>10} {:>10}",
                "Column", "Count", "Mean", "Std", "Min", "Max"
            );
            for num in &self.numeric_summaries {
                let _ = writeln!(
                    out,
                    "  {:<16} {:>7} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                    truncate(&num.name, 16),
                    num.count,
                    num.mean,
                    num.std,
                    num.min,
                    num.max
                );
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "TARGET DISTRIBUTION ({})", self.target_column);
        let _ = writeln!(out, "{rule}");
        if self.target_distribution.is_empty() {
            let _ = writeln!(out, "  (target column absent or non-text)");
        }
        for label in &self.target_distribution {
            let _ = writeln!(
                out,
                "  {:<10} {:>8}  ({:.1}%)",
                label.label, label.count, label.percentage
            );
        }
        let _ = writeln!(out);

        if !self.correlation_columns.is_empty() {
            let _ = writeln!(out, "CORRELATION MATRIX");
            let _ = writeln!(out, "{rule}");
            let mut header = format!("  {:<14}", "");
            for name in &self.correlation_columns {
                header.push_str(&format!(" {:>8}", truncate(name, 8)));
            }
            let _ = writeln!(out, "{header}");
            for (name, row) in self.correlation_columns.iter().zip(&self.correlation) {
                let mut line = format!("  {:<14}", truncate(name, 14));
                for value in row {
                    match value {
                        Some(r) => line.push_str(&format!(" {:>8.2}", r)),
                        None => line.push_str(&format!(" {:>8}", "N/A")),
                    }
                }
                let _ = writeln!(out, "{line}");
            }
        }

        out
    }
}

/// Truncate a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
