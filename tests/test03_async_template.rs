mod common;

use common::{CONNECTION_CLOSED, FakeSource, FakeState, id_and_name, users_state};
use sql_template::prelude::*;

#[tokio::test]
async fn async_query_runs_on_blocking_pool() -> Result<(), Box<dyn std::error::Error>> {
    let template = AsyncSqlTemplate::new(SqlTemplate::new(FakeSource::new(users_state())));
    let users = template
        .query("SELECT id, name FROM users WHERE age > ?", id_and_name, params![20])
        .await?;
    assert_eq!(users, vec![(1, "a".to_string()), (2, "b".to_string())]);
    assert_eq!(template.template().source().state.count(CONNECTION_CLOSED), 1);
    Ok(())
}

#[tokio::test]
async fn async_execute_keeps_suppression_contract() -> Result<(), Box<dyn std::error::Error>> {
    let template = AsyncSqlTemplate::new(SqlTemplate::new(FakeSource::new(FakeState {
        fail_acquire: true,
        ..FakeState::default()
    })));
    template.execute("DELETE FROM t", params![]).await?;
    assert!(matches!(
        template.try_execute("DELETE FROM t", params![]).await,
        Err(SqlTemplateError::AcquisitionFailure(_))
    ));
    Ok(())
}

#[tokio::test]
async fn async_query_single_checks_cardinality() -> Result<(), Box<dyn std::error::Error>> {
    let template = AsyncSqlTemplate::new(SqlTemplate::new(FakeSource::new(users_state())));
    let clone = template.clone();
    assert!(matches!(
        clone
            .query_single("SELECT id, name FROM users", id_and_name, params![])
            .await,
        Err(SqlTemplateError::CardinalityViolation { actual: 2 })
    ));
    Ok(())
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn async_round_trip_against_sqlite() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("async.db").to_string_lossy().into_owned();
    let template = AsyncSqlTemplate::new(
        SqlTemplate::sqlite_builder(path)
            .busy_timeout(std::time::Duration::from_secs(5))
            .failure_policy(FailurePolicy::Propagate)
            .build()?,
    );

    template
        .execute_request(StatementRequest::new_without_params(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)",
        ))
        .await?;

    let mut handles = Vec::new();
    for (id, name, age) in [(1, "a", 30), (2, "b", 41), (3, "c", 18)] {
        let t = template.clone();
        handles.push(tokio::spawn(async move {
            t.try_execute(
                "INSERT INTO users (id, name, age) VALUES (?, ?, ?)",
                params![id, name, age],
            )
            .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await??, 1);
    }

    let users = template
        .try_query(
            "SELECT id, name FROM users WHERE age > ? ORDER BY id",
            id_and_name,
            params![20],
        )
        .await?;
    assert_eq!(users, vec![(1, "a".to_string()), (2, "b".to_string())]);
    Ok(())
}
