use tracing::debug;

use crate::data::csv::Table;
use crate::error::{NnError, Result};

/// Which columns of a `Table` become features and which is the target.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub target: String,
    /// Columns expanded into one indicator column per distinct value.
    pub categorical: Vec<String>,
    /// Columns dropped entirely (ids and the like).
    pub ignore: Vec<String>,
}

/// Numeric features and single-unit targets ready for training.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDataset {
    pub feature_names: Vec<String>,
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
}

impl EncodedDataset {
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Turns a table into numbers.
///
/// Numeric columns keep their table order and come first; blank and
/// `N/A`-style cells become 0. Each categorical column then contributes one
/// `column_value` indicator per distinct value, in first-seen order; a blank
/// categorical cell sets none of them.
pub fn encode(table: &Table, options: &EncodeOptions) -> Result<EncodedDataset> {
    let target_idx = table.column_index(&options.target)?;
    let categorical_idx = options.categorical.iter()
        .map(|name| table.column_index(name))
        .collect::<Result<Vec<_>>>()?;
    let ignore_idx = options.ignore.iter()
        .map(|name| table.column_index(name))
        .collect::<Result<Vec<_>>>()?;

    let numeric_idx: Vec<usize> = (0..table.headers.len())
        .filter(|i| *i != target_idx && !categorical_idx.contains(i) && !ignore_idx.contains(i))
        .collect();

    let categories: Vec<Vec<String>> = categorical_idx.iter()
        .map(|&col| distinct_values(table, col))
        .collect();

    let mut feature_names: Vec<String> = numeric_idx.iter()
        .map(|&i| table.headers[i].clone())
        .collect();
    for (&col, values) in categorical_idx.iter().zip(&categories) {
        feature_names.extend(values.iter().map(|v| format!("{}_{}", table.headers[col], v)));
    }

    let mut inputs = Vec::with_capacity(table.rows.len());
    let mut targets = Vec::with_capacity(table.rows.len());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let mut features = Vec::with_capacity(feature_names.len());
        for &i in &numeric_idx {
            features.push(parse_number(&row[i], row_idx + 1, &table.headers[i])?);
        }
        for (&col, values) in categorical_idx.iter().zip(&categories) {
            let cell = row[col].trim();
            features.extend(values.iter().map(|v| if v == cell { 1.0 } else { 0.0 }));
        }
        inputs.push(features);
        targets.push(vec![parse_number(&row[target_idx], row_idx + 1, &options.target)?]);
    }

    debug!(rows = inputs.len(), features = feature_names.len(), "encoded table");
    Ok(EncodedDataset { feature_names, inputs, targets })
}

fn distinct_values(table: &Table, col: usize) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for row in &table.rows {
        let cell = row[col].trim();
        if !cell.is_empty() && !values.iter().any(|v| v == cell) {
            values.push(cell.to_string());
        }
    }
    values
}

fn parse_number(cell: &str, row_num: usize, column: &str) -> Result<f64> {
    let cell = cell.trim();
    if is_missing(cell) {
        return Ok(0.0);
    }
    cell.parse::<f64>().map_err(|_| {
        NnError::Csv(format!("Row {}: '{}' in column '{}' is not a valid number", row_num, cell, column))
    })
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || ["n/a", "na", "nan"].contains(&cell.to_ascii_lowercase().as_str())
}
