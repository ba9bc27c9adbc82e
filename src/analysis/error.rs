//! Error types for analysis operations

use crate::error::AppError;

/// Result type for analysis operations
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur in analysis operations
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Malformed holiday date entry
    #[error("Malformed holiday date '{0}': expected DD.MM.YYYY")]
    HolidayParse(String),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::HolidayParse(_) => AppError::Configuration(err.to_string()),
        }
    }
}
