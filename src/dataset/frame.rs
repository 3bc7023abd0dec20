//! Column-oriented table of listings.

use crate::preprocessing::PreprocessingError;
use crate::schema::{CarRecord, CATEGORICAL_FEATURES, NUMERIC_FEATURES};
use ndarray::Array2;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => f.write_str("numeric"),
            ColumnKind::Categorical => f.write_str("categorical"),
        }
    }
}

/// A single named column; `None` cells are missing values.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
        }
    }

    fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(values) => {
                Column::Numeric(indices.iter().map(|&i| values[i]).collect())
            }
            Column::Categorical(values) => {
                Column::Categorical(indices.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }
}

/// Named columns of equal length, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the feature frame of typed records, flags as 0/1.
    pub fn from_records(records: &[CarRecord]) -> Self {
        let mut numeric: Vec<Vec<Option<f64>>> =
            vec![Vec::with_capacity(records.len()); NUMERIC_FEATURES.len()];
        let mut categorical: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(records.len()); CATEGORICAL_FEATURES.len()];

        for record in records {
            for (column, value) in numeric.iter_mut().zip(record.numeric_values()) {
                column.push(Some(value));
            }
            for (column, label) in categorical.iter_mut().zip(record.categorical_values()) {
                column.push(Some(label.to_string()));
            }
        }

        let names = NUMERIC_FEATURES
            .iter()
            .chain(CATEGORICAL_FEATURES.iter())
            .map(|name| name.to_string())
            .collect();
        let columns = numeric
            .into_iter()
            .map(Column::Numeric)
            .chain(categorical.into_iter().map(Column::Categorical))
            .collect();

        Frame {
            names,
            columns,
            n_rows: records.len(),
        }
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), PreprocessingError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} rows", self.n_rows),
                got: format!("{} rows in column '{}'", column.len(), name),
            });
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<Self, PreprocessingError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.names.remove(idx);
        let column = self.columns.remove(idx);
        if self.columns.is_empty() {
            self.n_rows = 0;
        }
        Some(column)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    /// New frame holding the given rows, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Frame {
        Frame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            n_rows: indices.len(),
        }
    }

    /// Dense matrix of numeric columns with NaN for missing cells.
    pub fn numeric_matrix(&self, names: &[&str]) -> Result<Array2<f64>, PreprocessingError> {
        let columns = names
            .iter()
            .map(|name| match self.column(name) {
                Some(Column::Numeric(values)) => Ok(values),
                Some(Column::Categorical(_)) => Err(PreprocessingError::InvalidParameter(
                    format!("column '{}' is categorical, expected numeric", name),
                )),
                None => Err(PreprocessingError::MissingColumn(name.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Array2::from_shape_fn((self.n_rows, names.len()), |(row, col)| {
            columns[col][row].unwrap_or(f64::NAN)
        }))
    }

    pub fn categorical_matrix(
        &self,
        names: &[&str],
    ) -> Result<Array2<Option<String>>, PreprocessingError> {
        let columns = names
            .iter()
            .map(|name| match self.column(name) {
                Some(Column::Categorical(values)) => Ok(values),
                Some(Column::Numeric(_)) => Err(PreprocessingError::InvalidParameter(format!(
                    "column '{}' is numeric, expected categorical",
                    name
                ))),
                None => Err(PreprocessingError::MissingColumn(name.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Array2::from_shape_fn((self.n_rows, names.len()), |(row, col)| {
            columns[col][row].clone()
        }))
    }
}
