use std::fmt;

/// The outcome of validating a record before it is written.
///
/// A result with no messages is valid. Hooks from every class in the
/// record's ancestry contribute to one result through [`combine`].
///
/// [`combine`]: ValidationResult::combine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    messages: Vec<ValidationMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    /// The field the message refers to, if any.
    pub field: Option<String>,

    pub message: String,
}

impl ValidationResult {
    pub fn valid() -> ValidationResult {
        ValidationResult::default()
    }

    /// A result holding a single message that is not tied to a field.
    pub fn error(message: impl Into<String>) -> ValidationResult {
        ValidationResult {
            messages: vec![ValidationMessage {
                field: None,
                message: message.into(),
            }],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ValidationMessage) {
        self.messages.push(message);
    }

    pub fn combine(&mut self, other: ValidationResult) {
        self.messages.extend(other.messages);
    }
}

impl ValidationMessage {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> ValidationMessage {
        ValidationMessage {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            fmt::Display::fmt(message, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
