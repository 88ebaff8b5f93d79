use rusqlite::types::ValueRef;

use crate::error::SqlTemplateError;
use crate::source::{ResultCursor, RowAccess};
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlTemplateError::ExecutionFailure` if the column cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> Result<RowValues, SqlTemplateError> {
    let value = row
        .get_ref(idx)
        .map_err(SqlTemplateError::sqlite_execution)?;
    Ok(match value {
        ValueRef::Null => RowValues::Null,
        ValueRef::Integer(i) => RowValues::Int(i),
        ValueRef::Real(f) => RowValues::Float(f),
        ValueRef::Text(bytes) => RowValues::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(b) => RowValues::Blob(b.to_vec()),
    })
}

/// Cursor over `rusqlite::Rows`. The current row is copied out on each advance so the mapper
/// can read it through [`RowAccess`]. Dropping the cursor resets the statement.
pub struct SqliteCursor<'stmt> {
    rows: rusqlite::Rows<'stmt>,
    column_names: Vec<String>,
    current: Option<Vec<RowValues>>,
}

impl<'stmt> SqliteCursor<'stmt> {
    pub(crate) fn new(rows: rusqlite::Rows<'stmt>, column_names: Vec<String>) -> Self {
        Self {
            rows,
            column_names,
            current: None,
        }
    }
}

impl RowAccess for SqliteCursor<'_> {
    fn column_count(&self) -> usize {
        self.column_names.len()
    }

    fn column_name(&self, index: usize) -> Option<&str> {
        self.column_names.get(index).map(String::as_str)
    }

    fn value(&self, index: usize) -> Result<RowValues, SqlTemplateError> {
        let row = self.current.as_ref().ok_or_else(|| {
            SqlTemplateError::ExecutionFailure("cursor is not positioned on a row".into())
        })?;
        row.get(index).cloned().ok_or_else(|| {
            SqlTemplateError::ExecutionFailure(format!("column index {index} out of range"))
        })
    }
}

impl ResultCursor for SqliteCursor<'_> {
    fn advance(&mut self) -> Result<bool, SqlTemplateError> {
        let col_count = self.column_names.len();
        match self
            .rows
            .next()
            .map_err(SqlTemplateError::sqlite_execution)?
        {
            Some(row) => {
                let mut row_values = Vec::with_capacity(col_count);
                for i in 0..col_count {
                    row_values.push(sqlite_extract_value_sync(row, i)?);
                }
                self.current = Some(row_values);
                Ok(true)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }
}
