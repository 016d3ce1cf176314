use super::{Formatter, Ident, ToSql};

use crate::stmt::ColumnDef;

impl ToSql for &ColumnDef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(&self.name) " ");

        if self.auto_increment {
            fmt!(f, "INTEGER PRIMARY KEY AUTOINCREMENT");
        } else {
            fmt!(f, self.ty);
        }

        if self.not_null && !self.auto_increment {
            fmt!(f, " NOT NULL");
        }

        if let Some(default) = &self.default {
            fmt!(f, " DEFAULT " default);
        }
    }
}
