use tracing::{debug, warn};

use crate::binder::bind_params;
use crate::error::SqlTemplateError;
use crate::mapper::{CurrentRow, RowMapper};
use crate::source::{ConnectionSource, DbConnection, PreparedStatement, ResultCursor};
use crate::types::{FailurePolicy, RowValues, StatementRequest};

/// Options shared by every call made through a [`SqlTemplate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateOptions {
    pub failure_policy: FailurePolicy,
}

impl TemplateOptions {
    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}

/// Runs one statement per call against connections taken from `S`.
///
/// Every call acquires its own connection and prepared statement and releases both before
/// returning, whichever way the call ends. Nothing is cached between calls.
///
/// With the default [`FailurePolicy::Suppress`], [`execute`](Self::execute) and
/// [`query`](Self::query) log acquisition, execution, binding and mapping failures at `warn`
/// and return an empty result. Use [`FailurePolicy::Propagate`] or the `try_*` methods to see
/// those failures.
#[derive(Debug, Clone)]
pub struct SqlTemplate<S> {
    source: S,
    options: TemplateOptions,
}

impl<S: ConnectionSource> SqlTemplate<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, TemplateOptions::default())
    }

    pub fn with_options(source: S, options: TemplateOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> TemplateOptions {
        self.options
    }

    /// Run a mutating statement (INSERT, UPDATE, DELETE, DDL).
    ///
    /// # Errors
    /// Under [`FailurePolicy::Propagate`], returns any failure of
    /// [`try_execute`](Self::try_execute).
    /// Under [`FailurePolicy::Suppress`] this never fails.
    pub fn execute(&self, sql: &str, params: &[RowValues]) -> Result<(), SqlTemplateError> {
        let outcome = self.try_execute(sql, params).map(|_| ());
        self.settle(sql, outcome, || ())
    }

    /// Run a mutating statement and return the number of rows affected. Never suppresses.
    ///
    /// # Errors
    /// Returns acquisition, binding and execution failures as they occur.
    pub fn try_execute(&self, sql: &str, params: &[RowValues]) -> Result<usize, SqlTemplateError> {
        let mut conn = self.source.acquire()?;
        let mut stmt = conn.prepare(sql)?;
        debug!(sql, params = params.len(), "execute");
        bind_params(&mut stmt, params)?;
        stmt.execute_update()
    }

    /// Run a reading statement and map each row, in the order the driver delivers them.
    ///
    /// # Errors
    /// Under [`FailurePolicy::Propagate`], returns any failure of [`try_query`](Self::try_query).
    /// Under [`FailurePolicy::Suppress`] failures yield an empty `Vec`.
    pub fn query<T, M>(
        &self,
        sql: &str,
        mapper: M,
        params: &[RowValues],
    ) -> Result<Vec<T>, SqlTemplateError>
    where
        M: RowMapper<T>,
    {
        let outcome = self.try_query(sql, mapper, params);
        self.settle(sql, outcome, Vec::new)
    }

    /// Run a reading statement and map each row. Never suppresses.
    ///
    /// # Errors
    /// Returns acquisition, binding, execution and mapping failures as they occur.
    pub fn try_query<T, M>(
        &self,
        sql: &str,
        mut mapper: M,
        params: &[RowValues],
    ) -> Result<Vec<T>, SqlTemplateError>
    where
        M: RowMapper<T>,
    {
        let mut conn = self.source.acquire()?;
        let mut stmt = conn.prepare(sql)?;
        debug!(sql, params = params.len(), "query");
        bind_params(&mut stmt, params)?;

        let mut cursor = stmt.execute_query()?;
        let mut results = Vec::new();
        while cursor.advance()? {
            let row = CurrentRow::new(&cursor, results.len());
            let value = mapper
                .map_row(&row)
                .map_err(|e| e.into_mapping_failure(results.len()))?;
            results.push(value);
        }
        drop(cursor);
        Ok(results)
    }

    /// Run a reading statement that must produce exactly one row.
    ///
    /// # Errors
    /// Returns [`SqlTemplateError::CardinalityViolation`] when zero or several rows come back,
    /// including when a suppressed failure left the result empty. Other failures follow the
    /// template's [`FailurePolicy`].
    pub fn query_single<T, M>(
        &self,
        sql: &str,
        mapper: M,
        params: &[RowValues],
    ) -> Result<T, SqlTemplateError>
    where
        M: RowMapper<T>,
    {
        let mut results = self.query(sql, mapper, params)?;
        if results.len() != 1 {
            warn!(sql, rows = results.len(), "expected exactly one row");
            return Err(SqlTemplateError::CardinalityViolation {
                actual: results.len(),
            });
        }
        Ok(results.swap_remove(0))
    }

    /// [`execute`](Self::execute) for a bundled request.
    ///
    /// # Errors
    /// See [`execute`](Self::execute).
    pub fn execute_request(&self, request: &StatementRequest) -> Result<(), SqlTemplateError> {
        self.execute(&request.sql, &request.params)
    }

    /// [`query`](Self::query) for a bundled request.
    ///
    /// # Errors
    /// See [`query`](Self::query).
    pub fn query_request<T, M>(
        &self,
        request: &StatementRequest,
        mapper: M,
    ) -> Result<Vec<T>, SqlTemplateError>
    where
        M: RowMapper<T>,
    {
        self.query(&request.sql, mapper, &request.params)
    }

    fn settle<R>(
        &self,
        sql: &str,
        outcome: Result<R, SqlTemplateError>,
        fallback: impl FnOnce() -> R,
    ) -> Result<R, SqlTemplateError> {
        match outcome {
            Err(err)
                if self.options.failure_policy == FailurePolicy::Suppress
                    && err.is_suppressible() =>
            {
                warn!(sql, error = %err, "suppressed SQL failure");
                Ok(fallback())
            }
            other => other,
        }
    }
}
