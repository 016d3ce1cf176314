use crate::{
    schema::db,
    stmt::{Value, TIMESTAMP_FORMAT},
    Error, Result,
};

use chrono::NaiveDateTime;

/// The declared type of a class field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Boolean,
    Float,
    Text,
    Varchar(u32),
    Timestamp,

    /// Text restricted to a fixed set of values
    Enum(Vec<String>),

    /// Id of another record, `NULL` when unset
    ForeignKey,
}

impl ColumnType {
    pub fn storage_ty(&self) -> db::Type {
        match self {
            ColumnType::Int | ColumnType::ForeignKey => db::Type::Integer,
            ColumnType::Boolean => db::Type::Boolean,
            ColumnType::Float => db::Type::Real,
            ColumnType::Text | ColumnType::Enum(_) => db::Type::Text,
            ColumnType::Varchar(size) => db::Type::VarChar(*size),
            ColumnType::Timestamp => db::Type::DateTime,
        }
    }

    /// Numeric columns are `NOT NULL DEFAULT 0`, everything else is nullable.
    pub fn nullable(&self) -> bool {
        self.zero().is_none()
    }

    /// The column default used in DDL.
    pub fn column_default(&self) -> Option<Value> {
        self.zero()
    }

    fn zero(&self) -> Option<Value> {
        match self {
            ColumnType::Int => Some(Value::I64(0)),
            ColumnType::Boolean => Some(Value::Bool(false)),
            ColumnType::Float => Some(Value::F64(0.0)),
            _ => None,
        }
    }

    /// Converts `value` to the representation this column stores.
    ///
    /// Drivers hand back integers for booleans and text for timestamps; both
    /// are normalized here, as are loosely typed values assigned by callers.
    pub fn coerce(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(self.zero().unwrap_or(Value::Null));
        }

        match self {
            ColumnType::Int | ColumnType::ForeignKey => match value {
                Value::I64(_) => Ok(value),
                Value::Bool(v) => Ok(Value::I64(v as i64)),
                Value::F64(v) if v.fract() == 0.0 => Ok(Value::I64(v as i64)),
                Value::String(ref v) => match v.trim().parse::<i64>() {
                    Ok(v) => Ok(Value::I64(v)),
                    Err(_) => Err(Error::type_conversion(value, "Int")),
                },
                _ => Err(Error::type_conversion(value, "Int")),
            },
            ColumnType::Boolean => match value {
                Value::Bool(_) => Ok(value),
                Value::I64(v) => Ok(Value::Bool(v != 0)),
                Value::String(ref v) => match v.as_str() {
                    "1" | "true" => Ok(Value::Bool(true)),
                    "0" | "false" | "" => Ok(Value::Bool(false)),
                    _ => Err(Error::type_conversion(value, "Boolean")),
                },
                _ => Err(Error::type_conversion(value, "Boolean")),
            },
            ColumnType::Float => match value {
                Value::F64(_) => Ok(value),
                Value::I64(v) => Ok(Value::F64(v as f64)),
                Value::String(ref v) => match v.trim().parse::<f64>() {
                    Ok(v) => Ok(Value::F64(v)),
                    Err(_) => Err(Error::type_conversion(value, "Float")),
                },
                _ => Err(Error::type_conversion(value, "Float")),
            },
            ColumnType::Text | ColumnType::Varchar(_) => match value {
                Value::String(_) => Ok(value),
                Value::Timestamp(v) => Ok(Value::String(v.format(TIMESTAMP_FORMAT).to_string())),
                other => Ok(Value::String(String::try_from(other)?)),
            },
            ColumnType::Enum(values) => {
                let text = String::try_from(value)?;
                if values.iter().any(|v| *v == text) {
                    Ok(Value::String(text))
                } else {
                    Err(Error::type_conversion(Value::String(text), "Enum"))
                }
            }
            ColumnType::Timestamp => match value {
                Value::Timestamp(_) => Ok(value),
                Value::String(_) => Ok(Value::Timestamp(NaiveDateTime::try_from(value)?)),
                _ => Err(Error::type_conversion(value, "Timestamp")),
            },
        }
    }
}
