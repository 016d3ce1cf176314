use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::{Assignment, Delete, DropTable, Insert, Statement, Update};

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::CreateIndex(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Query(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = Ident(&self.table);

        if self.columns.is_empty() {
            fmt!(f, "INSERT INTO " table " DEFAULT VALUES");
            return;
        }

        let columns = Comma(self.columns.iter().map(Ident));
        let values = Comma(&self.values);
        fmt!(f, "INSERT INTO " table " (" columns ") VALUES (" values ")");
    }
}

impl ToSql for &Update {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = Ident(&self.table);
        let assignments = Comma(&self.assignments);
        fmt!(f, "UPDATE " table " SET " assignments);

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for &Assignment {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let value = &self.value;
        fmt!(f, Ident(&self.column) " = " value);
    }
}

impl ToSql for &Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = Ident(&self.table);
        fmt!(f, "DELETE FROM " table);

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for &DropTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        fmt!(f, "DROP TABLE " if_exists Ident(&self.name));
    }
}
