use super::column::{Column, ColumnData};
use super::value::Value;
use crate::error::{Result, ScrubError};

/// An ordered collection of uniquely named, equal-length columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, checking name uniqueness and equal column lengths
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Append a column at the end of the table
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.contains_column(column.name()) {
            return Err(ScrubError::DuplicateColumn { column: column.name().to_string() });
        }

        if self.columns.is_empty() {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            return Err(ScrubError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.row_count,
                found: column.len(),
            });
        }

        self.columns.push(column);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ScrubError::column_not_found(name))
    }

    pub(crate) fn column_data_mut(&mut self, name: &str) -> Result<&mut ColumnData> {
        self.columns
            .iter_mut()
            .find(|c| c.name() == name)
            .map(Column::data_mut)
            .ok_or_else(|| ScrubError::column_not_found(name))
    }

    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = (&str, &mut ColumnData)> + '_ {
        self.columns.iter_mut().map(Column::parts_mut)
    }

    /// Cells of one row across all columns, in column order
    pub fn row(&self, index: usize) -> Option<Vec<Option<Value>>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| c.get(index)).collect())
    }

    /// Keep the rows flagged true in `keep`; relative row order is preserved
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.row_count);
        for column in &mut self.columns {
            column.data_mut().retain_rows(keep);
        }
        self.row_count = keep.iter().filter(|k| **k).count();
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
