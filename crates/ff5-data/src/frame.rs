//! CSV reading shared by both input tables.
//!
//! Both files carry their date index in the first column, usually under an
//! empty header. The column is renamed [`DATE_COLUMN`] and kept as text so
//! the two files join on exactly the labels they were written with.

use std::path::Path;

use polars::prelude::*;

use crate::{DataError, Result};

/// Name given to the date index column after loading.
pub const DATE_COLUMN: &str = "date";

/// Read a CSV whose first column is a date index.
pub fn read_indexed_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    if df.width() == 0 || df.height() == 0 {
        return Err(DataError::Empty(path.display().to_string()));
    }

    let index_name = df.get_column_names()[0].to_string();
    if index_name != DATE_COLUMN {
        df.rename(&index_name, DATE_COLUMN.into())?;
    }

    let labels = df.column(DATE_COLUMN)?.cast(&DataType::String)?;
    if labels.null_count() > 0 {
        return Err(DataError::Parse(format!(
            "{} has rows without a date label",
            path.display()
        )));
    }
    df.with_column(labels)?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read csv"
    );

    Ok(df)
}

/// Names of every column except the date index, in file order.
pub fn value_columns(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .filter(|name| name != DATE_COLUMN)
        .collect()
}

/// Date labels, trimmed.
pub fn date_labels(df: &DataFrame) -> Result<Vec<String>> {
    let labels = df.column(DATE_COLUMN)?.cast(&DataType::String)?;
    let labels = labels.str()?;
    Ok(labels
        .into_iter()
        .map(|label| label.unwrap_or_default().trim().to_string())
        .collect())
}

/// Column values as floats. Nulls, unparseable cells and NaN become `None`.
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    let values = values.f64()?;
    Ok(values
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect())
}
