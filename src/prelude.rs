//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::async_template::AsyncSqlTemplate;
pub use crate::binder::{bind_param, bind_params};
pub use crate::error::SqlTemplateError;
pub use crate::mapper::{CurrentRow, FromRowValue, RowMapper};
pub use crate::params;
pub use crate::source::{ConnectionSource, DbConnection, PreparedStatement, ResultCursor, RowAccess};
pub use crate::template::{SqlTemplate, TemplateOptions};
pub use crate::types::{FailurePolicy, RowValues, StatementRequest};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder, SqliteSource};
