use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::CreateTable;

impl ToSql for &CreateTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let temporary = if self.temporary { "TEMPORARY " } else { "" };
        let name = Ident(&self.name);

        fmt!(f, "CREATE " temporary "TABLE " name);

        if let Some(query) = &self.as_query {
            let query = &**query;
            fmt!(f, " AS " query);
            return;
        }

        fmt!(f, " (" ColumnsWithConstraints(self) ")");
    }
}

struct ColumnsWithConstraints<'a>(&'a CreateTable);

impl ToSql for ColumnsWithConstraints<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        // SQLite needs the PK specified with the auto increment column
        let trailing_pk =
            !self.0.primary_key.is_empty() && !self.0.columns.iter().any(|c| c.auto_increment);

        for (index, column) in self.0.columns.iter().enumerate() {
            fmt!(f, "\n    " column);
            if index < self.0.columns.len() - 1 {
                fmt!(f, ",");
            }
        }

        if trailing_pk {
            let pk = Comma(self.0.primary_key.iter().map(Ident));
            fmt!(f, ",\n    PRIMARY KEY (" pk ")\n");
        } else {
            fmt!(f, "\n");
        }
    }
}
