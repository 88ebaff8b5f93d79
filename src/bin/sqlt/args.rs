use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use sql_template::{FailurePolicy, RowValues, SqlTemplateError, SqliteOptions};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run one SQL statement against a SQLite database")]
pub(crate) struct Args {
    /// Database file (or `file:` URI)
    #[arg(long)]
    pub(crate) db: PathBuf,
    #[arg(long)]
    pub(crate) read_only: bool,
    #[arg(long)]
    pub(crate) busy_timeout_ms: Option<u64>,
    #[arg(long, value_enum, default_value = "propagate")]
    pub(crate) policy: FailurePolicy,
    #[arg(long, default_value = "info")]
    pub(crate) log_level: Level,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Run a mutating statement
    Exec {
        sql: String,
        /// Positional parameter as `kind:value`, e.g. `int:20`, `text:alice`, `null`
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,
    },
    /// Run a query and print each row as a JSON object
    Query {
        sql: String,
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,
        /// Require exactly one row
        #[arg(long)]
        single: bool,
    },
}

impl Args {
    pub(crate) fn sqlite_options(&self) -> SqliteOptions {
        let mut opts = SqliteOptions::new(self.db.to_string_lossy().into_owned());
        opts.read_only = self.read_only;
        opts.busy_timeout = self.busy_timeout_ms.map(Duration::from_millis);
        opts.failure_policy = self.policy;
        opts
    }
}

/// Parse `kind:value` into a parameter value.
pub(crate) fn parse_param(raw: &str) -> Result<RowValues, SqlTemplateError> {
    if raw == "null" {
        return Ok(RowValues::Null);
    }
    let (kind, value) = raw
        .split_once(':')
        .ok_or_else(|| bad_param(raw, "expected `kind:value`"))?;
    match kind {
        "int" => value
            .parse()
            .map(RowValues::Int)
            .map_err(|e| bad_param(raw, &e.to_string())),
        "float" => value
            .parse()
            .map(RowValues::Float)
            .map_err(|e| bad_param(raw, &e.to_string())),
        "bool" => value
            .parse()
            .map(RowValues::Bool)
            .map_err(|e| bad_param(raw, &e.to_string())),
        "text" => Ok(RowValues::Text(value.to_owned())),
        "ts" => NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
            .map(RowValues::Timestamp)
            .map_err(|e| bad_param(raw, &e.to_string())),
        "json" => serde_json::from_str(value)
            .map(RowValues::JSON)
            .map_err(|e| bad_param(raw, &e.to_string())),
        "blob" => decode_hex(value)
            .map(RowValues::Blob)
            .ok_or_else(|| bad_param(raw, "blob must be an even-length hex string")),
        other => Err(bad_param(raw, &format!("unknown kind `{other}`"))),
    }
}

pub(crate) fn parse_params(raw: &[String]) -> Result<Vec<RowValues>, SqlTemplateError> {
    raw.iter().map(|p| parse_param(p)).collect()
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}

fn bad_param(raw: &str, reason: &str) -> SqlTemplateError {
    SqlTemplateError::ConfigError(format!("invalid parameter `{raw}`: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_kind() {
        assert_eq!(parse_param("int:20").unwrap(), RowValues::Int(20));
        assert_eq!(parse_param("float:1.5").unwrap(), RowValues::Float(1.5));
        assert_eq!(parse_param("bool:true").unwrap(), RowValues::Bool(true));
        assert_eq!(
            parse_param("text:a:b").unwrap(),
            RowValues::Text("a:b".into())
        );
        assert_eq!(parse_param("null").unwrap(), RowValues::Null);
        assert_eq!(
            parse_param("blob:00ff").unwrap(),
            RowValues::Blob(vec![0, 255])
        );
        assert_eq!(
            parse_param("json:[1,2]").unwrap(),
            RowValues::JSON(serde_json::json!([1, 2]))
        );
        assert!(matches!(
            parse_param("ts:2024-01-02 03:04:05").unwrap(),
            RowValues::Timestamp(_)
        ));
    }

    #[test]
    fn rejects_malformed_params() {
        for raw in ["20", "int:x", "blob:abc", "date:2024", "bool:yes"] {
            assert!(
                matches!(parse_param(raw), Err(SqlTemplateError::ConfigError(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn cli_parses_query_with_params() {
        let args = Args::try_parse_from([
            "sqlt",
            "--db",
            "x.db",
            "--policy",
            "suppress",
            "query",
            "SELECT 1 WHERE ? > 0",
            "-p",
            "int:3",
            "--single",
        ])
        .unwrap();
        assert_eq!(args.policy, FailurePolicy::Suppress);
        match args.command {
            Command::Query { params, single, .. } => {
                assert!(single);
                assert_eq!(params, vec!["int:3".to_string()]);
            }
            Command::Exec { .. } => panic!("expected query"),
        }
    }
}
