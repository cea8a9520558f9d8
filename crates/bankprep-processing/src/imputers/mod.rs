//! Missing-value imputation.

pub mod statistical;

pub use statistical::StatisticalImputer;
