use crate::error::SqlTemplateError;
use crate::source::PreparedStatement;
use crate::types::RowValues;

/// Placeholder index the first parameter binds to.
pub const FIRST_PARAM_INDEX: usize = 1;

/// Bind `params` in order: `params[0]` to placeholder 1, `params[1]` to placeholder 2, and so on.
///
/// # Errors
///
/// Returns [`SqlTemplateError::ExecutionFailure`] without binding anything if the statement
/// declares a different number of placeholders than `params` holds. Otherwise stops at the first
/// value the statement cannot bind and returns that error.
pub fn bind_params<P>(stmt: &mut P, params: &[RowValues]) -> Result<(), SqlTemplateError>
where
    P: PreparedStatement + ?Sized,
{
    if let Some(expected) = stmt.parameter_count().filter(|&n| n != params.len()) {
        return Err(SqlTemplateError::ExecutionFailure(format!(
            "statement declares {expected} parameters, got {}",
            params.len()
        )));
    }
    for (offset, param) in params.iter().enumerate() {
        bind_param(stmt, FIRST_PARAM_INDEX + offset, param)?;
    }
    Ok(())
}

/// Dispatch a single value to the statement's bind operation for its variant.
///
/// # Errors
///
/// Returns [`SqlTemplateError::UnsupportedParameterType`] if the backend has no rule for the
/// variant, or whatever the backend reports for the bind itself.
pub fn bind_param<P>(
    stmt: &mut P,
    position: usize,
    value: &RowValues,
) -> Result<(), SqlTemplateError>
where
    P: PreparedStatement + ?Sized,
{
    match value {
        RowValues::Int(i) => stmt.bind_int(position, *i),
        RowValues::Float(f) => stmt.bind_float(position, *f),
        RowValues::Text(s) => stmt.bind_text(position, s),
        RowValues::Bool(b) => stmt.bind_bool(position, *b),
        RowValues::Timestamp(dt) => stmt.bind_timestamp(position, dt),
        RowValues::Null => stmt.bind_null(position),
        RowValues::JSON(jval) => stmt.bind_json(position, jval),
        RowValues::Blob(bytes) => stmt.bind_blob(position, bytes),
    }
}
