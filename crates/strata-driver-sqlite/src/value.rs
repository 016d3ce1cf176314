use rusqlite::types::ValueRef;
use strata_core::stmt::Value;

/// Converts a SQLite value to a strata value.
///
/// SQLite has no boolean or date types, so those arrive as integers and text
/// and are coerced later against the column type.
pub(crate) fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::I64(v),
        ValueRef::Real(v) => Value::F64(v),
        ValueRef::Text(v) | ValueRef::Blob(v) => {
            Value::String(String::from_utf8_lossy(v).into_owned())
        }
    }
}
