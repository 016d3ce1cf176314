use super::{Formatter, ToSql};

use crate::stmt::Value;
use strata_core::stmt::TIMESTAMP_FORMAT;

impl ToSql for &Value {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Value::Null => f.dst.push_str("NULL"),
            Value::Bool(true) => f.dst.push('1'),
            Value::Bool(false) => f.dst.push('0'),
            Value::I64(v) => f.dst.push_str(&v.to_string()),
            Value::F64(v) if v.is_finite() => f.dst.push_str(&format!("{v:?}")),
            Value::F64(_) => f.dst.push_str("NULL"),
            Value::String(v) => Literal(v).to_sql(f),
            Value::Timestamp(v) => Literal(&v.format(TIMESTAMP_FORMAT).to_string()).to_sql(f),
        }
    }
}

/// A single-quoted string literal
struct Literal<'a>(&'a str);

impl ToSql for Literal<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push('\'');
        f.dst.push_str(&self.0.replace('\'', "''"));
        f.dst.push('\'');
    }
}
