use std::sync::Arc;

use tokio::task::spawn_blocking;

use crate::error::SqlTemplateError;
use crate::mapper::RowMapper;
use crate::source::ConnectionSource;
use crate::template::SqlTemplate;
use crate::types::{RowValues, StatementRequest};

/// Tokio-facing wrapper that runs each [`SqlTemplate`] call on the blocking thread pool.
///
/// Cloning is cheap; clones share the template.
///
/// ```rust,no_run
/// use sql_template::prelude::*;
///
/// # async fn demo() -> Result<(), SqlTemplateError> {
/// let template = SqlTemplate::sqlite_builder("app.db".into()).build()?;
/// let template = AsyncSqlTemplate::new(template);
/// template
///     .execute("INSERT INTO users (name) VALUES (?)", params!["alice"])
///     .await?;
/// # Ok(()) }
/// ```
pub struct AsyncSqlTemplate<S> {
    inner: Arc<SqlTemplate<S>>,
}

impl<S> Clone for AsyncSqlTemplate<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> AsyncSqlTemplate<S>
where
    S: ConnectionSource + Send + Sync + 'static,
{
    pub fn new(template: SqlTemplate<S>) -> Self {
        Self {
            inner: Arc::new(template),
        }
    }

    /// The wrapped synchronous template.
    pub fn template(&self) -> &SqlTemplate<S> {
        &self.inner
    }

    /// # Errors
    /// See [`SqlTemplate::execute`]; a failed blocking task is an `ExecutionFailure`.
    pub async fn execute(
        &self,
        sql: impl Into<String>,
        params: Vec<RowValues>,
    ) -> Result<(), SqlTemplateError> {
        let inner = Arc::clone(&self.inner);
        let sql = sql.into();
        run_blocking(move || inner.execute(&sql, &params)).await
    }

    /// # Errors
    /// See [`SqlTemplate::try_execute`].
    pub async fn try_execute(
        &self,
        sql: impl Into<String>,
        params: Vec<RowValues>,
    ) -> Result<usize, SqlTemplateError> {
        let inner = Arc::clone(&self.inner);
        let sql = sql.into();
        run_blocking(move || inner.try_execute(&sql, &params)).await
    }

    /// # Errors
    /// See [`SqlTemplate::query`].
    pub async fn query<T, M>(
        &self,
        sql: impl Into<String>,
        mapper: M,
        params: Vec<RowValues>,
    ) -> Result<Vec<T>, SqlTemplateError>
    where
        T: Send + 'static,
        M: RowMapper<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let sql = sql.into();
        run_blocking(move || inner.query(&sql, mapper, &params)).await
    }

    /// # Errors
    /// See [`SqlTemplate::try_query`].
    pub async fn try_query<T, M>(
        &self,
        sql: impl Into<String>,
        mapper: M,
        params: Vec<RowValues>,
    ) -> Result<Vec<T>, SqlTemplateError>
    where
        T: Send + 'static,
        M: RowMapper<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let sql = sql.into();
        run_blocking(move || inner.try_query(&sql, mapper, &params)).await
    }

    /// # Errors
    /// See [`SqlTemplate::query_single`].
    pub async fn query_single<T, M>(
        &self,
        sql: impl Into<String>,
        mapper: M,
        params: Vec<RowValues>,
    ) -> Result<T, SqlTemplateError>
    where
        T: Send + 'static,
        M: RowMapper<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let sql = sql.into();
        run_blocking(move || inner.query_single(&sql, mapper, &params)).await
    }

    /// # Errors
    /// See [`SqlTemplate::execute_request`].
    pub async fn execute_request(&self, request: StatementRequest) -> Result<(), SqlTemplateError> {
        self.execute(request.sql, request.params).await
    }
}

async fn run_blocking<F, R>(func: F) -> Result<R, SqlTemplateError>
where
    F: FnOnce() -> Result<R, SqlTemplateError> + Send + 'static,
    R: Send + 'static,
{
    spawn_blocking(func).await.map_err(|e| {
        SqlTemplateError::ExecutionFailure(format!("spawn_blocking join error: {e}"))
    })?
}
