use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlTemplateError {
    #[error("Acquisition error: {0}")]
    AcquisitionFailure(String),

    #[error("SQL execution error: {0}")]
    ExecutionFailure(String),

    #[error("Unsupported parameter type `{type_name}` at position {position}")]
    UnsupportedParameterType {
        position: usize,
        type_name: &'static str,
    },

    #[error("Row mapping error at row {row}: {message}")]
    MappingFailure { row: usize, message: String },

    #[error("Expected exactly one row, got {actual}")]
    CardinalityViolation { actual: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SqlTemplateError {
    /// Whether this failure belongs to the execution path that a
    /// [`FailurePolicy::Suppress`](crate::FailurePolicy::Suppress) template swallows.
    #[must_use]
    pub fn is_suppressible(&self) -> bool {
        matches!(
            self,
            Self::AcquisitionFailure(_)
                | Self::ExecutionFailure(_)
                | Self::UnsupportedParameterType { .. }
                | Self::MappingFailure { .. }
        )
    }

    /// Re-tag an error raised while converting row `row` as a mapping failure.
    ///
    /// Errors that already carry a row index keep it.
    #[must_use]
    pub(crate) fn into_mapping_failure(self, row: usize) -> Self {
        match self {
            Self::MappingFailure { .. } => self,
            other => Self::MappingFailure {
                row,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(feature = "sqlite")]
impl SqlTemplateError {
    pub(crate) fn sqlite_acquisition(err: rusqlite::Error) -> Self {
        Self::AcquisitionFailure(format!("sqlite: {err}"))
    }

    pub(crate) fn sqlite_execution(err: rusqlite::Error) -> Self {
        Self::ExecutionFailure(format!("sqlite: {err}"))
    }
}
