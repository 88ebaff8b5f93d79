use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlTemplateError;
use crate::source::RowAccess;
use crate::types::RowValues;

/// Converts the row a cursor is positioned on into a caller-defined value.
///
/// Implemented for any `FnMut(&CurrentRow<'_>) -> Result<T, SqlTemplateError>`, so a closure is
/// usually enough:
///
/// ```rust
/// use sql_template::prelude::*;
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// let _mapper = |row: &CurrentRow<'_>| -> Result<User, SqlTemplateError> {
///     Ok(User {
///         id: row.try_get("id")?,
///         name: row.try_get("name")?,
///     })
/// };
/// ```
pub trait RowMapper<T> {
    /// # Errors
    /// Any error returned here is reported as [`SqlTemplateError::MappingFailure`].
    fn map_row(&mut self, row: &CurrentRow<'_>) -> Result<T, SqlTemplateError>;
}

impl<T, F> RowMapper<T> for F
where
    F: FnMut(&CurrentRow<'_>) -> Result<T, SqlTemplateError>,
{
    fn map_row(&mut self, row: &CurrentRow<'_>) -> Result<T, SqlTemplateError> {
        self(row)
    }
}

/// The row under the cursor. Borrowed for one mapper call only.
pub struct CurrentRow<'r> {
    access: &'r dyn RowAccess,
    row: usize,
}

impl<'r> CurrentRow<'r> {
    pub(crate) fn new(access: &'r dyn RowAccess, row: usize) -> Self {
        Self { access, row }
    }

    /// Zero-based position of this row in the result set.
    #[must_use]
    pub fn row_number(&self) -> usize {
        self.row
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.access.column_count()
    }

    /// Name of the zero-based column `index`, if the driver reports one.
    #[must_use]
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.access.column_name(index)
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        (0..self.access.column_count())
            .filter_map(|i| self.access.column_name(i))
            .collect()
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        (0..self.access.column_count()).find(|&i| self.access.column_name(i) == Some(column_name))
    }

    /// Get a value from the row by column name
    ///
    /// # Errors
    /// Returns [`SqlTemplateError::MappingFailure`] if the column does not exist.
    pub fn get(&self, column_name: &str) -> Result<RowValues, SqlTemplateError> {
        let idx = self
            .get_column_index(column_name)
            .ok_or_else(|| self.failure(format!("no column named `{column_name}`")))?;
        self.get_by_index(idx)
    }

    /// Get a value from the row by zero-based column index
    ///
    /// # Errors
    /// Returns [`SqlTemplateError::MappingFailure`] if the index is out of range.
    pub fn get_by_index(&self, index: usize) -> Result<RowValues, SqlTemplateError> {
        if index >= self.access.column_count() {
            return Err(self.failure(format!(
                "column index {index} out of range ({} columns)",
                self.access.column_count()
            )));
        }
        self.access
            .value(index)
            .map_err(|e| e.into_mapping_failure(self.row))
    }

    /// Get a column by name and convert it.
    ///
    /// # Errors
    /// Returns [`SqlTemplateError::MappingFailure`] if the column is missing or has another type.
    pub fn try_get<T: FromRowValue>(&self, column_name: &str) -> Result<T, SqlTemplateError> {
        let value = self.get(column_name)?;
        T::from_row_value(&value).ok_or_else(|| {
            self.failure(format!(
                "column `{column_name}` holds {}, expected {}",
                value.type_name(),
                T::EXPECTED
            ))
        })
    }

    /// Get a column by zero-based index and convert it.
    ///
    /// # Errors
    /// Returns [`SqlTemplateError::MappingFailure`] if the column is missing or has another type.
    pub fn try_get_by_index<T: FromRowValue>(&self, index: usize) -> Result<T, SqlTemplateError> {
        let value = self.get_by_index(index)?;
        T::from_row_value(&value).ok_or_else(|| {
            self.failure(format!(
                "column {index} holds {}, expected {}",
                value.type_name(),
                T::EXPECTED
            ))
        })
    }

    fn failure(&self, message: String) -> SqlTemplateError {
        SqlTemplateError::MappingFailure {
            row: self.row,
            message,
        }
    }
}

/// Conversion from a column value into a Rust type.
pub trait FromRowValue: Sized {
    /// Type name used in mismatch messages.
    const EXPECTED: &'static str;

    fn from_row_value(value: &RowValues) -> Option<Self>;
}

impl FromRowValue for RowValues {
    const EXPECTED: &'static str = "any";

    fn from_row_value(value: &RowValues) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromRowValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_int().copied()
    }
}

impl FromRowValue for f64 {
    const EXPECTED: &'static str = "float";

    // NUMERIC and REAL columns may hand back whole numbers as integers.
    #[allow(clippy::cast_precision_loss)]
    fn from_row_value(value: &RowValues) -> Option<Self> {
        match value {
            RowValues::Float(f) => Some(*f),
            RowValues::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl FromRowValue for String {
    const EXPECTED: &'static str = "text";

    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }
}

impl FromRowValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_bool().copied()
    }
}

impl FromRowValue for Vec<u8> {
    const EXPECTED: &'static str = "blob";

    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_blob().map(<[u8]>::to_vec)
    }
}

impl FromRowValue for NaiveDateTime {
    const EXPECTED: &'static str = "timestamp";

    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_timestamp()
    }
}

impl FromRowValue for JsonValue {
    const EXPECTED: &'static str = "json";

    fn from_row_value(value: &RowValues) -> Option<Self> {
        match value {
            RowValues::JSON(v) => Some(v.clone()),
            RowValues::Text(s) => serde_json::from_str(s).ok(),
            _ => None,
        }
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_row_value(value: &RowValues) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_row_value(value).map(Some)
        }
    }
}
