use super::{Expr, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<Assignment>,

    /// Updates every row when `None`
    pub filter: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

impl Update {
    pub fn new(table: impl Into<String>) -> Update {
        Update {
            table: table.into(),
            assignments: vec![],
            filter: None,
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Update {
        self.assignments.push(Assignment {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn filter(mut self, filter: impl Into<Expr>) -> Update {
        self.filter = Some(filter.into());
        self
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}
