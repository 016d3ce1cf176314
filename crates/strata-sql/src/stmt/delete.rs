use super::{Expr, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,

    /// Deletes every row when `None`
    pub filter: Option<Expr>,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Delete {
        Delete {
            table: table.into(),
            filter: None,
        }
    }

    pub fn filter(mut self, filter: impl Into<Expr>) -> Delete {
        self.filter = Some(filter.into());
        self
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}
