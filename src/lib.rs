//! One statement per call over a pluggable SQL driver.
//!
//! [`SqlTemplate`] acquires a connection and a prepared statement for each call, binds
//! positional parameters by their [`RowValues`] variant, runs the statement, maps rows through a
//! caller-supplied [`RowMapper`], and releases everything before returning.
//!
//! ```rust,no_run
//! use sql_template::prelude::*;
//!
//! # fn demo() -> Result<(), SqlTemplateError> {
//! let template = SqlTemplate::sqlite_builder("app.db".into()).build()?;
//! template.execute("CREATE TABLE IF NOT EXISTS users (id INTEGER, name TEXT, age INTEGER)", &[])?;
//! template.execute("INSERT INTO users VALUES (?, ?, ?)", &params![1, "a", 30])?;
//!
//! let names = template.query(
//!     "SELECT id, name FROM users WHERE age > ?",
//!     |row: &CurrentRow<'_>| row.try_get::<String>("name"),
//!     &params![20],
//! )?;
//! assert_eq!(names, vec!["a".to_string()]);
//! # Ok(()) }
//! ```

pub mod async_template;
pub mod binder;
pub mod error;
pub mod mapper;
pub mod prelude;
pub mod source;
pub mod template;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use async_template::AsyncSqlTemplate;
pub use error::SqlTemplateError;
pub use mapper::{CurrentRow, FromRowValue, RowMapper};
pub use source::{ConnectionSource, DbConnection, PreparedStatement, ResultCursor, RowAccess};
pub use template::{SqlTemplate, TemplateOptions};
pub use types::{FailurePolicy, RowValues, StatementRequest};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteOptions, SqliteSource};
