//! Configuration for the cleaning pipeline.
//!
//! The schema, column roles, and the documented points of variance are all
//! captured in one immutable [`CleaningConfig`] value handed to the pipeline
//! at construction. [`CleaningConfig::default`] is the bank-marketing survey
//! schema; the builder exists so tests and the CLI can toggle the variance
//! points without shared state.

use crate::schema::{
    ColumnRole, EDUCATION_COLUMN, KEEP_COLUMNS, NUMERIC_COLUMNS, PDAYS_COLUMN, PDAYS_SENTINEL,
    TARGET_COLUMN, YEAR_COLUMN,
};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// A column derived from an existing one.
///
/// The deriver rewrites `source` in place and inserts `name` immediately
/// after it. Both columns carry meaningful missingness afterwards, so the
/// imputer leaves them alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedColumn {
    pub source: String,
    pub name: String,
}

/// A numeric value that encodes "no observation" and must be demoted to
/// missing before any statistic is computed over its column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSentinel {
    pub column: String,
    pub value: f64,
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to override individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Declared output schema, in output order.
    pub keep_columns: Vec<String>,

    /// Columns parsed as numeric. Every kept column that is neither listed
    /// here nor the target is categorical.
    pub numeric_columns: Vec<String>,

    /// The label column. Normalized at the end, never imputed.
    pub target_column: String,

    /// Optional derived column (education → year by default).
    pub derived: Option<DerivedColumn>,

    /// Numeric sentinel encodings demoted to missing during coercion.
    /// Default: pdays = 999 ("never previously contacted").
    pub numeric_sentinels: Vec<NumericSentinel>,

    /// Numeric columns excluded from min-max scaling.
    /// Default: ["age"] (age is kept as its raw value).
    pub scale_exclude: Vec<String>,

    /// Expand day_of_week abbreviations to full weekday names.
    /// Default: false.
    pub expand_weekday_names: bool,

    /// Restrict 2-decimal rounding to these numeric columns; `None` rounds
    /// every float column. Default: None.
    pub round_columns: Option<Vec<String>>,

    /// Literal rendered for missing cells in the final output.
    pub missing_token: String,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            keep_columns: KEEP_COLUMNS.iter().map(|s| s.to_string()).collect(),
            numeric_columns: NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect(),
            target_column: TARGET_COLUMN.to_string(),
            derived: Some(DerivedColumn {
                source: EDUCATION_COLUMN.to_string(),
                name: YEAR_COLUMN.to_string(),
            }),
            numeric_sentinels: vec![NumericSentinel {
                column: PDAYS_COLUMN.to_string(),
                value: PDAYS_SENTINEL,
            }],
            scale_exclude: vec!["age".to_string()],
            expand_weekday_names: false,
            round_columns: None,
            missing_token: crate::utils::MISSING_SENTINEL.to_string(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.keep_columns.is_empty() {
            return Err(ConfigValidationError::EmptyKeepList);
        }

        if self.numeric_columns.iter().any(|c| c == &self.target_column) {
            return Err(ConfigValidationError::TargetListedAsNumeric(
                self.target_column.clone(),
            ));
        }

        for col in &self.scale_exclude {
            if !self.numeric_columns.contains(col) {
                return Err(ConfigValidationError::NotNumeric {
                    list: "scale_exclude",
                    column: col.clone(),
                });
            }
        }

        if let Some(round_columns) = &self.round_columns {
            for col in round_columns {
                if !self.numeric_columns.contains(col) {
                    return Err(ConfigValidationError::NotNumeric {
                        list: "round_columns",
                        column: col.clone(),
                    });
                }
            }
        }

        if let Some(derived) = &self.derived
            && derived.source == derived.name
        {
            return Err(ConfigValidationError::DerivedSelfReference(
                derived.name.clone(),
            ));
        }

        Ok(())
    }

    /// Role of a column under this configuration.
    ///
    /// Anything kept that is neither numeric nor the target is categorical;
    /// this covers the derived year column by construction.
    pub fn role_of(&self, name: &str) -> ColumnRole {
        if name == self.target_column {
            ColumnRole::Target
        } else if self.numeric_columns.iter().any(|c| c == name) {
            ColumnRole::Numeric
        } else {
            ColumnRole::Categorical
        }
    }

    /// Declared numeric columns present in the table, in declared order.
    pub fn numeric_columns_in(&self, df: &DataFrame) -> Vec<String> {
        self.numeric_columns
            .iter()
            .filter(|c| df.column(c).is_ok())
            .cloned()
            .collect()
    }

    /// Categorical columns present in the table, in table order.
    pub fn categorical_columns_in(&self, df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| self.role_of(name) == ColumnRole::Categorical)
            .collect()
    }

    /// Whether a numeric column takes part in min-max scaling.
    pub fn is_scaled(&self, name: &str) -> bool {
        !self.scale_exclude.iter().any(|c| c == name)
    }

    /// Whether a float column is rounded to 2 decimals by the formatter.
    pub fn rounds(&self, name: &str) -> bool {
        match &self.round_columns {
            Some(columns) => columns.iter().any(|c| c == name),
            None => true,
        }
    }

    /// Columns the imputer must leave alone: the target plus the derived
    /// column and its source, whose missingness is meaningful.
    pub fn impute_exempt(&self, name: &str) -> bool {
        if name == self.target_column {
            return true;
        }
        match &self.derived {
            Some(derived) => name == derived.source || name == derived.name,
            None => false,
        }
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("keep_columns must not be empty")]
    EmptyKeepList,

    #[error("Target column '{0}' must not be listed as numeric")]
    TargetListedAsNumeric(String),

    #[error("Column '{column}' in {list} is not a declared numeric column")]
    NotNumeric { list: &'static str, column: String },

    #[error("Derived column '{0}' must differ from its source")]
    DerivedSelfReference(String),
}

/// Builder for [`CleaningConfig`] with fluent API.
///
/// Starts from the default bank-marketing schema; every setter overrides one
/// field.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    keep_columns: Option<Vec<String>>,
    numeric_columns: Option<Vec<String>>,
    target_column: Option<String>,
    derived: Option<Option<DerivedColumn>>,
    numeric_sentinels: Option<Vec<NumericSentinel>>,
    scale_exclude: Option<Vec<String>>,
    expand_weekday_names: Option<bool>,
    round_columns: Option<Option<Vec<String>>>,
    missing_token: Option<String>,
}

impl CleaningConfigBuilder {
    /// Set the declared output schema.
    pub fn keep_columns(mut self, columns: Vec<String>) -> Self {
        self.keep_columns = Some(columns);
        self
    }

    /// Set the numeric column list.
    pub fn numeric_columns(mut self, columns: Vec<String>) -> Self {
        self.numeric_columns = Some(columns);
        self
    }

    /// Set the target column.
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Set or disable the derived column.
    pub fn derived(mut self, derived: Option<DerivedColumn>) -> Self {
        self.derived = Some(derived);
        self
    }

    /// Set the numeric sentinel encodings.
    pub fn numeric_sentinels(mut self, sentinels: Vec<NumericSentinel>) -> Self {
        self.numeric_sentinels = Some(sentinels);
        self
    }

    /// Set the columns excluded from scaling. An empty list scales every
    /// numeric column, age included.
    pub fn scale_exclude(mut self, columns: Vec<String>) -> Self {
        self.scale_exclude = Some(columns);
        self
    }

    /// Enable or disable weekday-name expansion.
    pub fn expand_weekday_names(mut self, expand: bool) -> Self {
        self.expand_weekday_names = Some(expand);
        self
    }

    /// Restrict rounding to a subset of numeric columns.
    pub fn round_columns(mut self, columns: Option<Vec<String>>) -> Self {
        self.round_columns = Some(columns);
        self
    }

    /// Override the missing-value literal.
    pub fn missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing_token = Some(token.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            keep_columns: self.keep_columns.unwrap_or(defaults.keep_columns),
            numeric_columns: self.numeric_columns.unwrap_or(defaults.numeric_columns),
            target_column: self.target_column.unwrap_or(defaults.target_column),
            derived: self.derived.unwrap_or(defaults.derived),
            numeric_sentinels: self.numeric_sentinels.unwrap_or(defaults.numeric_sentinels),
            scale_exclude: self.scale_exclude.unwrap_or(defaults.scale_exclude),
            expand_weekday_names: self
                .expand_weekday_names
                .unwrap_or(defaults.expand_weekday_names),
            round_columns: self.round_columns.unwrap_or(defaults.round_columns),
            missing_token: self.missing_token.unwrap_or(defaults.missing_token),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.keep_columns.len(), 21);
        assert_eq!(config.numeric_columns.len(), 10);
        assert_eq!(config.target_column, "y");
        assert_eq!(config.scale_exclude, vec!["age".to_string()]);
        assert_eq!(config.missing_token, "N/A");
        assert!(!config.expand_weekday_names);
        assert!(config.round_columns.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_sentinel_is_pdays_999() {
        let config = CleaningConfig::default();
        assert_eq!(
            config.numeric_sentinels,
            vec![NumericSentinel {
                column: "pdays".to_string(),
                value: 999.0
            }]
        );
    }

    #[test]
    fn test_builder_defaults() {
        let config = CleaningConfig::builder().build().unwrap();
        assert_eq!(config, CleaningConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .scale_exclude(vec![])
            .expand_weekday_names(true)
            .round_columns(Some(vec!["duration".to_string()]))
            .build()
            .unwrap();

        assert!(config.is_scaled("age"));
        assert!(config.expand_weekday_names);
        assert!(config.rounds("duration"));
        assert!(!config.rounds("age"));
    }

    #[test]
    fn test_validation_scale_exclude_must_be_numeric() {
        let result = CleaningConfig::builder()
            .scale_exclude(vec!["job".to_string()])
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NotNumeric {
                list: "scale_exclude",
                ..
            }
        ));
    }

    #[test]
    fn test_validation_round_columns_must_be_numeric() {
        let result = CleaningConfig::builder()
            .round_columns(Some(vec!["education".to_string()]))
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NotNumeric {
                list: "round_columns",
                ..
            }
        ));
    }

    #[test]
    fn test_validation_target_not_numeric() {
        let result = CleaningConfig::builder().target_column("age").build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::TargetListedAsNumeric(_)
        ));
    }

    #[test]
    fn test_validation_derived_self_reference() {
        let result = CleaningConfig::builder()
            .derived(Some(DerivedColumn {
                source: "education".to_string(),
                name: "education".to_string(),
            }))
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::DerivedSelfReference(_)
        ));
    }

    #[test]
    fn test_role_of() {
        let config = CleaningConfig::default();
        assert_eq!(config.role_of("age"), ColumnRole::Numeric);
        assert_eq!(config.role_of("pdays"), ColumnRole::Numeric);
        assert_eq!(config.role_of("job"), ColumnRole::Categorical);
        assert_eq!(config.role_of("year"), ColumnRole::Categorical);
        assert_eq!(config.role_of("y"), ColumnRole::Target);
    }

    #[test]
    fn test_impute_exempt() {
        let config = CleaningConfig::default();
        assert!(config.impute_exempt("y"));
        assert!(config.impute_exempt("education"));
        assert!(config.impute_exempt("year"));
        assert!(!config.impute_exempt("job"));
        assert!(!config.impute_exempt("age"));
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = CleaningConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CleaningConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }
}
