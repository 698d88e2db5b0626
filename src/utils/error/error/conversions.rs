//! Type conversions for RelayError

use super::types::RelayError;

impl From<tokio::time::error::Elapsed> for RelayError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        RelayError::Timeout(err.to_string())
    }
}

impl From<chrono::ParseError> for RelayError {
    fn from(err: chrono::ParseError) -> Self {
        RelayError::Validation(format!("Invalid time value: {}", err))
    }
}
