use std::time::Duration;

use rusqlite::OpenFlags;
use serde::Serialize;

use crate::error::SqlTemplateError;
use crate::source::ConnectionSource;
use crate::template::{SqlTemplate, TemplateOptions};
use crate::types::FailurePolicy;

use super::statement::SqliteConnection;

/// Options for opening `SQLite` connections.
#[derive(Debug, Clone, Serialize)]
pub struct SqliteOptions {
    pub db_path: String,
    pub read_only: bool,
    pub busy_timeout: Option<Duration>,
    pub wal: bool,
    pub failure_policy: FailurePolicy,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            read_only: false,
            busy_timeout: None,
            wal: false,
            failure_policy: FailurePolicy::default(),
        }
    }

    fn open_flags(&self) -> OpenFlags {
        if self.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        }
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.opts.read_only = read_only;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout = Some(timeout);
        self
    }

    /// Switch the database file to WAL journaling when the template is built.
    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.opts.failure_policy = failure_policy;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build a template over a [`SqliteSource`].
    ///
    /// # Errors
    ///
    /// Returns `SqlTemplateError` if the options are invalid or the WAL pragma fails.
    pub fn build(self) -> Result<SqlTemplate<SqliteSource>, SqlTemplateError> {
        SqlTemplate::new_sqlite(self.finish())
    }
}

/// Opens a new `rusqlite::Connection` on every [`acquire`](ConnectionSource::acquire).
#[derive(Debug, Clone)]
pub struct SqliteSource {
    opts: SqliteOptions,
}

impl SqliteSource {
    /// # Errors
    /// Returns [`SqlTemplateError::ConfigError`] if `db_path` is empty.
    pub fn new(opts: SqliteOptions) -> Result<Self, SqlTemplateError> {
        if opts.db_path.trim().is_empty() {
            return Err(SqlTemplateError::ConfigError(
                "sqlite db_path must not be empty".into(),
            ));
        }
        Ok(Self { opts })
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.opts
    }
}

impl ConnectionSource for SqliteSource {
    type Connection = SqliteConnection;

    fn acquire(&self) -> Result<SqliteConnection, SqlTemplateError> {
        let conn = rusqlite::Connection::open_with_flags(&self.opts.db_path, self.opts.open_flags())
            .map_err(SqlTemplateError::sqlite_acquisition)?;
        if let Some(timeout) = self.opts.busy_timeout {
            conn.busy_timeout(timeout)
                .map_err(SqlTemplateError::sqlite_acquisition)?;
        }
        Ok(SqliteConnection::new(conn))
    }
}

impl SqlTemplate<SqliteSource> {
    #[must_use]
    pub fn sqlite_builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Initializer for a template over `SQLite`.
    ///
    /// # Errors
    /// Returns `SqlTemplateError::ConfigError` for invalid options and
    /// `SqlTemplateError::AcquisitionFailure` if the WAL setup connection fails.
    pub fn new_sqlite(opts: SqliteOptions) -> Result<Self, SqlTemplateError> {
        if opts.wal && opts.read_only {
            return Err(SqlTemplateError::ConfigError(
                "WAL journaling cannot be enabled on a read-only database".into(),
            ));
        }
        let failure_policy = opts.failure_policy;
        let wal = opts.wal;
        let source = SqliteSource::new(opts)?;

        if wal {
            let conn = source.acquire()?;
            conn.raw()
                .execute_batch("PRAGMA journal_mode = WAL;")
                .map_err(SqlTemplateError::sqlite_acquisition)?;
        }

        Ok(SqlTemplate::with_options(
            source,
            TemplateOptions::default().with_failure_policy(failure_policy),
        ))
    }
}
