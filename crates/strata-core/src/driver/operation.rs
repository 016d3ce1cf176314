mod exec_sql;
pub use exec_sql::ExecSql;

mod query_sql;
pub use query_sql::QuerySql;

mod transaction;
pub use transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Execute a statement that returns no rows
    ExecSql(ExecSql),

    /// Fetch the id generated by the most recent insert on this connection
    LastInsertId,

    /// Execute a SQL query
    QuerySql(QuerySql),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    /// The SQL text carried by the operation, if any.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Operation::ExecSql(op) => Some(&op.sql),
            Operation::QuerySql(op) => Some(&op.sql),
            _ => None,
        }
    }

    /// Whether the operation may change stored data.
    pub fn is_write(&self) -> bool {
        matches!(self, Operation::ExecSql(_))
    }
}
