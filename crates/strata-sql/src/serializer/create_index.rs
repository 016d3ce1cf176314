use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::CreateIndex;

impl ToSql for &CreateIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let index_name = Ident(&self.name);
        let table_name = Ident(&self.table);
        let columns = Comma(self.columns.iter().map(Ident));
        let unique = if self.unique { "UNIQUE " } else { "" };

        fmt!(
            f, "CREATE " unique "INDEX IF NOT EXISTS " index_name " ON " table_name " (" columns ")"
        );
    }
}
