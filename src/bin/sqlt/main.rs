mod args;

use std::process::ExitCode;

use clap::Parser;
use serde_json::{Map, Value as JsonValue};
use sql_template::prelude::*;

use crate::args::{Args, Command, parse_params};

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(args.log_level)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SqlTemplateError> {
    let opts = args.sqlite_options();
    let opts_json = serde_json::to_string(&opts).unwrap_or_else(|_| "{}".to_string());
    tracing::debug!("options: {}", opts_json);

    let template = SqlTemplate::new_sqlite(opts)?;

    match &args.command {
        Command::Exec { sql, params } => {
            let params = parse_params(params)?;
            template.execute(sql, &params)
        }
        Command::Query {
            sql,
            params,
            single,
        } => {
            let params = parse_params(params)?;
            let rows = if *single {
                vec![template.query_single(sql, row_to_json, &params)?]
            } else {
                template.query(sql, row_to_json, &params)?
            };
            for row in rows {
                println!("{row}");
            }
            Ok(())
        }
    }
}

fn row_to_json(row: &CurrentRow<'_>) -> Result<JsonValue, SqlTemplateError> {
    let mut object = Map::new();
    for idx in 0..row.column_count() {
        let key = row
            .column_name(idx)
            .map_or_else(|| idx.to_string(), str::to_owned);
        object.insert(key, row.get_by_index(idx)?.to_json());
    }
    Ok(JsonValue::Object(object))
}
