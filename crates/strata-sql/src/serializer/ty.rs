use super::{Formatter, ToSql};

use strata_core::schema::db::Type;

impl ToSql for Type {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Type::Boolean => fmt!(f, "BOOLEAN"),
            Type::Integer => fmt!(f, "INTEGER"),
            Type::Real => fmt!(f, "REAL"),
            Type::Text => fmt!(f, "TEXT"),
            Type::VarChar(size) => f.dst.push_str(&format!("VARCHAR({size})")),
            Type::DateTime => fmt!(f, "DATETIME"),
        }
    }
}
