use super::{Expr, Statement};

/// `INSERT INTO table (columns) VALUES (values)`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,

    /// One value per column
    pub values: Vec<Expr>,
}

impl Insert {
    pub fn new(table: impl Into<String>) -> Insert {
        Insert {
            table: table.into(),
            columns: vec![],
            values: vec![],
        }
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Insert {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}
