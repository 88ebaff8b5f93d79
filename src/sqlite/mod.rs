// SQLite backend for the template
//
// - config: options, builder, and the per-call connection source
// - params: text forms for values SQLite has no native type for
// - statement: connection and prepared statement handles
// - query: cursor and value extraction

pub mod config;
pub mod params;
pub mod query;
pub mod statement;

pub use config::{SqliteOptions, SqliteOptionsBuilder, SqliteSource};
pub use query::SqliteCursor;
pub use statement::{SqliteConnection, SqliteStatement};
