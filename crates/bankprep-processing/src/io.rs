//! Boundary CSV I/O.
//!
//! Loading and saving sit outside the pipeline: the table is loaded once,
//! cleaned, and saved once. The raw extract is read with schema inference
//! disabled so every column arrives as text and the coercer owns all
//! numeric parsing.

use crate::error::{CleaningError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Load the semicolon-delimited survey extract.
///
/// All columns are read as text. A file that parses to a single column was
/// almost certainly written with a different delimiter and is rejected as
/// malformed before the pipeline runs.
pub fn load_survey_extract(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(b';'))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    if df.width() <= 1 {
        return Err(CleaningError::MalformedInput(format!(
            "'{}' parsed to {} column(s); expected a ';'-delimited table",
            path.display(),
            df.width()
        )));
    }

    info!(
        "Loaded '{}': {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write the cleaned table as comma-delimited CSV with header.
pub fn write_cleaned_table(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;

    info!("Saved '{}': {} rows", path.display(), df.height());
    Ok(())
}
