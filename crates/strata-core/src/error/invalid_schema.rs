use super::Error;

/// Error when a class definition cannot be turned into a schema.
///
/// This occurs when:
/// - Two classes, tables or indices share a name
/// - A parent or relation target names a class that was never registered
/// - A `has_many` has no `has_one` on the target pointing back at the owner
/// - A relation is looked up that no class in the ancestry declares
///
/// These errors surface when the schema is built, before any SQL is issued.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
    }
}
