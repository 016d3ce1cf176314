use super::Error;

/// Error when a field name is not part of a class's database fields.
#[derive(Debug)]
pub(super) struct UnknownFieldError {
    class: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnknownFieldError {}

impl core::fmt::Display for UnknownFieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown field `{}` on class `{}`", self.field, self.class)
    }
}

impl Error {
    /// Creates an unknown field error.
    pub fn unknown_field(class: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownField(UnknownFieldError {
            class: class.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown field error.
    pub fn is_unknown_field(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnknownField(_)))
    }
}
