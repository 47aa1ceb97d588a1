use super::value::{SemanticType, Value};
use crate::error::Result;
use chrono::NaiveDateTime;

/// Typed cell storage for one column; `None` marks a missing cell
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Date(Vec<Option<NaiveDateTime>>),
    Boolean(Vec<Option<bool>>),
}

impl ColumnData {
    pub fn kind(&self) -> SemanticType {
        match self {
            ColumnData::Numeric(_) => SemanticType::Numeric,
            ColumnData::Text(_) => SemanticType::Text,
            ColumnData::Date(_) => SemanticType::Date,
            ColumnData::Boolean(_) => SemanticType::Boolean,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row`, or `None` if the cell is missing or out of range
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(Value::Numeric),
            ColumnData::Text(v) => v.get(row).cloned().flatten().map(Value::Text),
            ColumnData::Date(v) => v.get(row).copied().flatten().map(Value::Date),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map(Value::Boolean),
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(v) => matches!(v.get(row), Some(None)),
            ColumnData::Text(v) => matches!(v.get(row), Some(None)),
            ColumnData::Date(v) => matches!(v.get(row), Some(None)),
            ColumnData::Boolean(v) => matches!(v.get(row), Some(None)),
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => count_missing(v),
            ColumnData::Text(v) => count_missing(v),
            ColumnData::Date(v) => count_missing(v),
            ColumnData::Boolean(v) => count_missing(v),
        }
    }

    /// All non-missing values in row order
    pub fn present_values(&self) -> Vec<Value> {
        (0..self.len()).filter_map(|row| self.get(row)).collect()
    }

    /// Replace every missing cell with `value`, coerced to this column's type.
    ///
    /// Returns the number of cells filled.
    pub fn fill_missing_with(&mut self, value: &Value, column: &str) -> Result<usize> {
        let coerced = value.coerce_to(self.kind(), column)?;
        let filled = match (self, coerced) {
            (ColumnData::Numeric(v), Value::Numeric(n)) => fill_cells(v, n),
            (ColumnData::Text(v), Value::Text(s)) => fill_cells(v, s),
            (ColumnData::Date(v), Value::Date(d)) => fill_cells(v, d),
            (ColumnData::Boolean(v), Value::Boolean(b)) => fill_cells(v, b),
            // coerce_to always yields the column's own type
            _ => 0,
        };
        Ok(filled)
    }

    /// Keep only the rows whose flag in `keep` is true
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        match self {
            ColumnData::Numeric(v) => retain_by_mask(v, keep),
            ColumnData::Text(v) => retain_by_mask(v, keep),
            ColumnData::Date(v) => retain_by_mask(v, keep),
            ColumnData::Boolean(v) => retain_by_mask(v, keep),
        }
    }
}

fn count_missing<T>(values: &[Option<T>]) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

fn fill_cells<T: Clone>(values: &mut [Option<T>], fill: T) -> usize {
    let mut filled = 0;
    for cell in values.iter_mut().filter(|c| c.is_none()) {
        *cell = Some(fill.clone());
        filled += 1;
    }
    filled
}

fn retain_by_mask<T>(values: &mut Vec<Option<T>>, keep: &[bool]) {
    let mut row = 0;
    values.retain(|_| {
        let kept = keep.get(row).copied().unwrap_or(true);
        row += 1;
        kept
    });
}

/// A named column of typed cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self { name: name.into(), data }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, ColumnData::Text(values))
    }

    pub fn date(name: impl Into<String>, values: Vec<Option<NaiveDateTime>>) -> Self {
        Self::new(name, ColumnData::Date(values))
    }

    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SemanticType {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<Value> {
        self.data.get(row)
    }

    pub fn missing_count(&self) -> usize {
        self.data.missing_count()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Mutable access to the cells.
    ///
    /// Crate-private so that row counts can only change through [`super::Table`].
    pub(crate) fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    pub(crate) fn parts_mut(&mut self) -> (&str, &mut ColumnData) {
        (&self.name, &mut self.data)
    }

    pub fn into_data(self) -> ColumnData {
        self.data
    }
}
