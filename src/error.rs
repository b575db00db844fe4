//! Error taxonomy for pipeline operations.

use std::path::PathBuf;

use serde_json::{json, Value};
use thiserror::Error;

/// Errors surfaced by the dataset, training, prediction and reporting operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required field or column was absent.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// A value had the wrong type or was out of range.
    #[error("invalid input '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// The cleaned table or model artifact does not exist yet.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// Too few usable rows to split and fit.
    #[error("insufficient data: need at least {required} usable rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted artifact could not be parsed or serialized.
    #[error("malformed data in {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("model fitting failed: {0}")]
    Fit(String),
}

impl PipelineError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        PipelineError::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Stable slug used in structured error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MissingInput(_) => "missing_input",
            PipelineError::InvalidInput { .. } => "invalid_input",
            PipelineError::DataUnavailable(_) => "data_unavailable",
            PipelineError::InsufficientData { .. } => "insufficient_data",
            PipelineError::Io { .. } | PipelineError::Format { .. } => "io_failure",
            PipelineError::Fit(_) => "fit_failure",
        }
    }

    pub fn to_response(&self) -> Value {
        json!({
            "status": "error",
            "kind": self.kind(),
            "message": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_both_counts() {
        let error = PipelineError::InsufficientData {
            required: 5,
            actual: 3,
        };
        assert_eq!(
            error.to_string(),
            "insufficient data: need at least 5 usable rows, got 3"
        );
        assert_eq!(error.kind(), "insufficient_data");
    }

    #[test]
    fn io_and_format_share_the_io_failure_kind() {
        let io = PipelineError::io(
            "data/model.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let format = PipelineError::format("data/model.json", "expected value");

        assert_eq!(io.kind(), "io_failure");
        assert_eq!(format.kind(), "io_failure");
        assert!(io.to_string().contains("data/model.json"));
    }

    #[test]
    fn response_carries_status_kind_and_message() {
        let error = PipelineError::invalid("age", "must be within (0, 120]");
        let body = error.to_response();

        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "invalid_input");
        assert_eq!(body["message"], "invalid input 'age': must be within (0, 120]");
    }
}
