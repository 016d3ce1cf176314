use crate::{Error, Result};

use std::fmt;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Double precision float
    F64(f64),

    /// Signed 64-bit integer. Ids and foreign keys are stored this way.
    I64(i64),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),

    /// A date and time without an offset, stored in UTC.
    Timestamp(chrono::NaiveDateTime),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            Self::Bool(v) => Some(*v as i64),
            Self::String(v) => v.parse().ok(),
            _ => None,
        }
    }

    /// Interprets the value as a record id.
    ///
    /// Ids are positive; zero, negative numbers and non-numeric values mean
    /// "no record".
    pub fn to_id(&self) -> Option<u64> {
        self.as_i64()
            .filter(|id| *id > 0)
            .and_then(|id| u64::try_from(id).ok())
    }

    /// Whether the value counts as set for boolean flags stored as integers.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(v) => *v,
            Self::F64(v) => *v != 0.0,
            Self::I64(v) => *v != 0,
            Self::String(v) => !v.is_empty() && v != "0",
            Self::Timestamp(_) => true,
        }
    }

    /// Name of the variant, used in conversion errors.
    pub fn ty_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::F64(_) => "F64",
            Self::I64(_) => "I64",
            Self::Null => "Null",
            Self::String(_) => "String",
            Self::Timestamp(_) => "Timestamp",
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Null => f.write_str("NULL"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Timestamp(v) => write!(f, "{}", v.format(super::TIMESTAMP_FORMAT)),
        }
    }
}

impl AsRef<Self> for Value {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<&Value> for Value {
    fn from(src: &Value) -> Self {
        src.clone()
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::I64(_) | Value::F64(_) | Value::Bool(_) | Value::Timestamp(_) => {
                Ok(value.to_string())
            }
            _ => Err(Error::type_conversion(value, "String")),
        }
    }
}

impl TryFrom<Value> for Option<String> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => String::try_from(value).map(Some),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            Value::String(ref v) if v == "0" || v == "1" => Ok(v == "1"),
            _ => Err(Error::type_conversion(value, "bool")),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::I64(v) => Ok(v as f64),
            Value::String(ref v) => v
                .parse()
                .map_err(|_| Error::type_conversion(value.clone(), "f64")),
            _ => Err(Error::type_conversion(value, "f64")),
        }
    }
}
