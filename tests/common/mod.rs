#![allow(dead_code)]

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use sql_template::prelude::*;

pub const CONNECTION_CLOSED: &str = "connection closed";
pub const STATEMENT_CLOSED: &str = "statement closed";
pub const CURSOR_CLOSED: &str = "cursor closed";
pub const EXECUTED: &str = "executed";

/// Scripted driver behaviour plus everything the template did to it.
#[derive(Default)]
pub struct FakeState {
    pub fail_acquire: bool,
    pub fail_prepare: bool,
    pub fail_execute: bool,
    /// Position whose bind the driver rejects.
    pub fail_bind_at: Option<usize>,
    /// Placeholder count the prepared statement reports.
    pub parameter_count: Option<usize>,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<RowValues>>,
    pub update_count: usize,
    pub prepared_sql: Mutex<Vec<String>>,
    pub bound: Mutex<Vec<(usize, RowValues)>>,
    pub events: Mutex<Vec<&'static str>>,
}

impl FakeState {
    pub fn with_rows(columns: Vec<&'static str>, rows: Vec<Vec<RowValues>>) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn count(&self, event: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == event)
            .count()
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    pub fn bound(&self) -> Vec<(usize, RowValues)> {
        self.bound.lock().unwrap().clone()
    }

    fn record(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Clone)]
pub struct FakeSource {
    pub state: Arc<FakeState>,
}

impl FakeSource {
    pub fn new(state: FakeState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }
}

impl ConnectionSource for FakeSource {
    type Connection = FakeConnection;

    fn acquire(&self) -> Result<FakeConnection, SqlTemplateError> {
        if self.state.fail_acquire {
            return Err(SqlTemplateError::AcquisitionFailure(
                "connection refused".into(),
            ));
        }
        Ok(FakeConnection {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct FakeConnection {
    state: Arc<FakeState>,
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.state.record(CONNECTION_CLOSED);
    }
}

impl DbConnection for FakeConnection {
    type Statement<'c>
        = FakeStatement<'c>
    where
        Self: 'c;

    fn prepare<'c>(&'c mut self, sql: &str) -> Result<FakeStatement<'c>, SqlTemplateError> {
        if self.state.fail_prepare {
            return Err(SqlTemplateError::AcquisitionFailure(format!(
                "cannot prepare `{sql}`"
            )));
        }
        self.state.prepared_sql.lock().unwrap().push(sql.to_owned());
        Ok(FakeStatement {
            state: Arc::clone(&self.state),
            _conn: PhantomData,
        })
    }
}

/// Binds everything except JSON, which it has no rule for.
pub struct FakeStatement<'c> {
    state: Arc<FakeState>,
    _conn: PhantomData<&'c mut FakeConnection>,
}

impl FakeStatement<'_> {
    fn capture(&self, position: usize, value: RowValues) -> Result<(), SqlTemplateError> {
        if self.state.fail_bind_at == Some(position) {
            return Err(SqlTemplateError::ExecutionFailure(format!(
                "driver rejected parameter {position}"
            )));
        }
        self.state.bound.lock().unwrap().push((position, value));
        Ok(())
    }
}

impl Drop for FakeStatement<'_> {
    fn drop(&mut self) {
        self.state.record(STATEMENT_CLOSED);
    }
}

impl PreparedStatement for FakeStatement<'_> {
    type Cursor<'s>
        = FakeCursor<'s>
    where
        Self: 's;

    fn bind_null(&mut self, position: usize) -> Result<(), SqlTemplateError> {
        self.capture(position, RowValues::Null)
    }

    fn bind_int(&mut self, position: usize, value: i64) -> Result<(), SqlTemplateError> {
        self.capture(position, RowValues::Int(value))
    }

    fn bind_float(&mut self, position: usize, value: f64) -> Result<(), SqlTemplateError> {
        self.capture(position, RowValues::Float(value))
    }

    fn bind_text(&mut self, position: usize, value: &str) -> Result<(), SqlTemplateError> {
        self.capture(position, RowValues::Text(value.to_owned()))
    }

    fn bind_blob(&mut self, position: usize, value: &[u8]) -> Result<(), SqlTemplateError> {
        self.capture(position, RowValues::Blob(value.to_vec()))
    }

    fn bind_bool(&mut self, position: usize, value: bool) -> Result<(), SqlTemplateError> {
        self.capture(position, RowValues::Bool(value))
    }

    fn bind_timestamp(
        &mut self,
        position: usize,
        value: &chrono::NaiveDateTime,
    ) -> Result<(), SqlTemplateError> {
        self.capture(position, RowValues::Timestamp(*value))
    }

    fn parameter_count(&self) -> Option<usize> {
        self.state.parameter_count
    }

    fn execute_update(&mut self) -> Result<usize, SqlTemplateError> {
        self.state.record(EXECUTED);
        if self.state.fail_execute {
            return Err(SqlTemplateError::ExecutionFailure(
                "constraint violation".into(),
            ));
        }
        Ok(self.state.update_count)
    }

    fn execute_query(&mut self) -> Result<Self::Cursor<'_>, SqlTemplateError> {
        self.state.record(EXECUTED);
        if self.state.fail_execute {
            return Err(SqlTemplateError::ExecutionFailure(
                "connection lost".into(),
            ));
        }
        Ok(FakeCursor {
            state: Arc::clone(&self.state),
            current: None,
            next: 0,
            _stmt: PhantomData,
        })
    }
}

pub struct FakeCursor<'s> {
    state: Arc<FakeState>,
    current: Option<usize>,
    next: usize,
    _stmt: PhantomData<&'s mut ()>,
}

impl Drop for FakeCursor<'_> {
    fn drop(&mut self) {
        self.state.record(CURSOR_CLOSED);
    }
}

impl RowAccess for FakeCursor<'_> {
    fn column_count(&self) -> usize {
        self.state.columns.len()
    }

    fn column_name(&self, index: usize) -> Option<&str> {
        self.state.columns.get(index).copied()
    }

    fn value(&self, index: usize) -> Result<RowValues, SqlTemplateError> {
        self.current
            .and_then(|row| self.state.rows.get(row))
            .and_then(|row| row.get(index))
            .cloned()
            .ok_or_else(|| SqlTemplateError::ExecutionFailure(format!("no value at {index}")))
    }
}

impl ResultCursor for FakeCursor<'_> {
    fn advance(&mut self) -> Result<bool, SqlTemplateError> {
        if self.next < self.state.rows.len() {
            self.current = Some(self.next);
            self.next += 1;
            Ok(true)
        } else {
            self.current = None;
            Ok(false)
        }
    }
}

pub fn users_state() -> FakeState {
    FakeState::with_rows(
        vec!["id", "name"],
        vec![
            vec![RowValues::Int(1), RowValues::Text("a".into())],
            vec![RowValues::Int(2), RowValues::Text("b".into())],
        ],
    )
}

pub fn id_and_name(row: &CurrentRow<'_>) -> Result<(i64, String), SqlTemplateError> {
    Ok((row.try_get("id")?, row.try_get("name")?))
}
