use super::Value;
use crate::{Error, Result};

macro_rules! impl_int {
    ( $( $ty:ty => $name:literal ),* $(,)? ) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    let converted = match &value {
                        Value::I64(v) => <$ty>::try_from(*v).ok(),
                        Value::Bool(v) => Some(*v as $ty),
                        Value::String(v) => v.parse::<$ty>().ok(),
                        _ => None,
                    };

                    converted.ok_or_else(|| Error::type_conversion(value, $name))
                }
            }

            impl TryFrom<Value> for Option<$ty> {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::Null => Ok(None),
                        value => <$ty>::try_from(value).map(Some),
                    }
                }
            }
        )*
    };
}

impl_int! {
    i32 => "i32",
    i64 => "i64",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I64(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::I64(value.into())
    }
}

/// Ids are allocated by the database as positive 64-bit integers, so values
/// beyond `i64::MAX` never reach a column.
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::I64(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::I64(i64::try_from(value).unwrap_or(i64::MAX))
    }
}
