#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Period};

mod ident;
use ident::Ident;

// Fragment serializers
mod column_def;
mod create_index;
mod create_table;
mod expr;
mod query;
mod statement;
mod ty;
mod value;

use crate::stmt::{SqlQuery, Statement};

use strata_core::driver::operation::Transaction;

/// Serialize a statement to a SQL string
///
/// Values are rendered inline as literals. Strings are quoted with doubled
/// single quotes and identifiers with doubled double quotes, so any value or
/// name round-trips through the generated SQL.
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    _priv: (),
}

struct Formatter<'a> {
    /// Where to write the serialized SQL
    dst: &'a mut String,
}

impl Serializer {
    pub fn sqlite() -> Serializer {
        Serializer { _priv: () }
    }

    pub fn serialize(&self, stmt: &Statement) -> String {
        self.render(stmt)
    }

    pub fn serialize_query(&self, query: &SqlQuery) -> String {
        self.render(query)
    }

    /// Serialize a transaction control operation to a SQL string.
    ///
    /// Savepoints are named `sp_{id}`.
    pub fn serialize_transaction(&self, op: &Transaction) -> String {
        match op {
            Transaction::Start => "BEGIN".to_string(),
            Transaction::Commit => "COMMIT".to_string(),
            Transaction::Rollback => "ROLLBACK".to_string(),
            Transaction::Savepoint(id) => format!("SAVEPOINT sp_{id}"),
            Transaction::ReleaseSavepoint(id) => format!("RELEASE SAVEPOINT sp_{id}"),
            Transaction::RollbackToSavepoint(id) => format!("ROLLBACK TO SAVEPOINT sp_{id}"),
        }
    }

    fn render(&self, fragment: impl ToSql) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter { dst: &mut ret };
        fragment.to_sql(&mut fmt);

        ret
    }
}
