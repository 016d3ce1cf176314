use super::Error;
use crate::ValidationResult;

/// Error when a record fails validation and the write is aborted.
#[derive(Debug)]
pub(super) struct ValidationError {
    result: ValidationResult,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "validation failed: {}", self.result)
    }
}

impl Error {
    /// Creates a validation error carrying the failed result.
    pub fn validation(result: ValidationResult) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError { result }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Validation(_)))
    }

    /// Returns the validation result if this error, or its cause chain,
    /// carries one.
    pub fn validation_result(&self) -> Option<&ValidationResult> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::Validation(err) => Some(&err.result),
            _ => None,
        })
    }
}
