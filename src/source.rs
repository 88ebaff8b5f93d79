//! Capabilities a database driver provides to the template.
//!
//! A [`ConnectionSource`] hands out connections, a [`DbConnection`] prepares one statement at a
//! time, and a [`PreparedStatement`] binds positional parameters and runs either an update or a
//! query. Handles are released by `Drop`; the borrow structure guarantees a cursor is dropped
//! before its statement and a statement before its connection.

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlTemplateError;
use crate::types::RowValues;

/// Yields a fresh connection per call.
pub trait ConnectionSource {
    type Connection: DbConnection;

    /// # Errors
    /// Returns [`SqlTemplateError::AcquisitionFailure`] if no connection can be obtained.
    fn acquire(&self) -> Result<Self::Connection, SqlTemplateError>;
}

/// An open connection able to prepare statements.
pub trait DbConnection {
    type Statement<'c>: PreparedStatement
    where
        Self: 'c;

    /// # Errors
    /// Returns [`SqlTemplateError::AcquisitionFailure`] if the statement cannot be prepared.
    fn prepare<'c>(&'c mut self, sql: &str) -> Result<Self::Statement<'c>, SqlTemplateError>;
}

/// A prepared statement with 1-based positional placeholders.
///
/// `bind_bool`, `bind_timestamp` and `bind_json` have no binding rule unless the backend
/// provides one; the default reports [`SqlTemplateError::UnsupportedParameterType`].
pub trait PreparedStatement {
    type Cursor<'s>: ResultCursor
    where
        Self: 's;

    fn bind_null(&mut self, position: usize) -> Result<(), SqlTemplateError>;

    fn bind_int(&mut self, position: usize, value: i64) -> Result<(), SqlTemplateError>;

    fn bind_float(&mut self, position: usize, value: f64) -> Result<(), SqlTemplateError>;

    fn bind_text(&mut self, position: usize, value: &str) -> Result<(), SqlTemplateError>;

    fn bind_blob(&mut self, position: usize, value: &[u8]) -> Result<(), SqlTemplateError>;

    fn bind_bool(&mut self, position: usize, _value: bool) -> Result<(), SqlTemplateError> {
        Err(SqlTemplateError::UnsupportedParameterType {
            position,
            type_name: "bool",
        })
    }

    fn bind_timestamp(
        &mut self,
        position: usize,
        _value: &NaiveDateTime,
    ) -> Result<(), SqlTemplateError> {
        Err(SqlTemplateError::UnsupportedParameterType {
            position,
            type_name: "timestamp",
        })
    }

    fn bind_json(&mut self, position: usize, _value: &JsonValue) -> Result<(), SqlTemplateError> {
        Err(SqlTemplateError::UnsupportedParameterType {
            position,
            type_name: "json",
        })
    }

    /// Number of placeholders the prepared SQL declares, if the driver can tell.
    ///
    /// When this is `Some`, the parameter list must have exactly that many values.
    fn parameter_count(&self) -> Option<usize> {
        None
    }

    /// Run a mutating statement and return the number of rows affected.
    ///
    /// # Errors
    /// Returns [`SqlTemplateError::ExecutionFailure`] if the driver rejects the statement.
    fn execute_update(&mut self) -> Result<usize, SqlTemplateError>;

    /// Run a reading statement and return a cursor positioned before the first row.
    ///
    /// # Errors
    /// Returns [`SqlTemplateError::ExecutionFailure`] if the driver rejects the statement.
    fn execute_query(&mut self) -> Result<Self::Cursor<'_>, SqlTemplateError>;
}

/// Read access to the row a cursor is positioned on.
pub trait RowAccess {
    fn column_count(&self) -> usize;

    /// Name of the zero-based column `index`.
    fn column_name(&self, index: usize) -> Option<&str>;

    /// Value of the zero-based column `index` in the current row.
    ///
    /// # Errors
    /// Returns an error if there is no current row or the index is out of range.
    fn value(&self, index: usize) -> Result<RowValues, SqlTemplateError>;
}

/// Forward-only iteration over a result set. Dropping the cursor closes it.
pub trait ResultCursor: RowAccess {
    /// Move to the next row. Returns `false` once the rows are exhausted.
    ///
    /// # Errors
    /// Returns [`SqlTemplateError::ExecutionFailure`] if stepping the driver fails.
    fn advance(&mut self) -> Result<bool, SqlTemplateError>;
}
