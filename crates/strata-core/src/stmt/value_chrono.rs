use chrono::NaiveDateTime;

use crate::{stmt::Value, Error, Result};

/// Text form of timestamps, both in SQL literals and in the database.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl TryFrom<Value> for NaiveDateTime {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(value) => Ok(value),
            Value::String(ref text) => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
                .map_err(|_| Error::type_conversion(value.clone(), "NaiveDateTime")),
            _ => Err(Error::type_conversion(value, "NaiveDateTime")),
        }
    }
}

impl TryFrom<Value> for Option<NaiveDateTime> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => NaiveDateTime::try_from(value).map(Some),
        }
    }
}
