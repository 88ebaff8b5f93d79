use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlTemplateError;
use crate::source::{DbConnection, PreparedStatement};

use super::params::timestamp_to_sqlite_text;
use super::query::SqliteCursor;

/// A connection opened by [`SqliteSource`](super::SqliteSource). Closed on drop.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    pub(crate) fn new(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// The underlying `rusqlite` connection.
    #[must_use]
    pub fn raw(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl DbConnection for SqliteConnection {
    type Statement<'c>
        = SqliteStatement<'c>
    where
        Self: 'c;

    fn prepare<'c>(&'c mut self, sql: &str) -> Result<SqliteStatement<'c>, SqlTemplateError> {
        let stmt = self
            .conn
            .prepare(sql)
            .map_err(SqlTemplateError::sqlite_acquisition)?;
        Ok(SqliteStatement { stmt })
    }
}

/// A prepared `SQLite` statement. Finalized on drop.
pub struct SqliteStatement<'conn> {
    stmt: rusqlite::Statement<'conn>,
}

impl SqliteStatement<'_> {
    fn bind<T: rusqlite::ToSql>(
        &mut self,
        position: usize,
        value: T,
    ) -> Result<(), SqlTemplateError> {
        self.stmt
            .raw_bind_parameter(position, value)
            .map_err(SqlTemplateError::sqlite_execution)
    }
}

impl PreparedStatement for SqliteStatement<'_> {
    type Cursor<'s>
        = SqliteCursor<'s>
    where
        Self: 's;

    fn bind_null(&mut self, position: usize) -> Result<(), SqlTemplateError> {
        self.bind(position, rusqlite::types::Null)
    }

    fn bind_int(&mut self, position: usize, value: i64) -> Result<(), SqlTemplateError> {
        self.bind(position, value)
    }

    fn bind_float(&mut self, position: usize, value: f64) -> Result<(), SqlTemplateError> {
        self.bind(position, value)
    }

    fn bind_text(&mut self, position: usize, value: &str) -> Result<(), SqlTemplateError> {
        self.bind(position, value)
    }

    fn bind_blob(&mut self, position: usize, value: &[u8]) -> Result<(), SqlTemplateError> {
        self.bind(position, value)
    }

    fn bind_bool(&mut self, position: usize, value: bool) -> Result<(), SqlTemplateError> {
        self.bind(position, i64::from(value))
    }

    fn bind_timestamp(
        &mut self,
        position: usize,
        value: &NaiveDateTime,
    ) -> Result<(), SqlTemplateError> {
        self.bind(position, timestamp_to_sqlite_text(value))
    }

    fn bind_json(&mut self, position: usize, value: &JsonValue) -> Result<(), SqlTemplateError> {
        self.bind(position, value.to_string())
    }

    fn parameter_count(&self) -> Option<usize> {
        Some(self.stmt.parameter_count())
    }

    fn execute_update(&mut self) -> Result<usize, SqlTemplateError> {
        self.stmt
            .raw_execute()
            .map_err(SqlTemplateError::sqlite_execution)
    }

    fn execute_query(&mut self) -> Result<Self::Cursor<'_>, SqlTemplateError> {
        let column_names: Vec<String> = self
            .stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect();
        Ok(SqliteCursor::new(self.stmt.raw_query(), column_names))
    }
}
