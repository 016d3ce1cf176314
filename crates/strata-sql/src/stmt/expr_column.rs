use super::Expr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprColumn {
    /// Alias of the `from` entry the column belongs to. Unqualified when
    /// `None`.
    pub table: Option<String>,

    pub name: String,
}

impl Expr {
    /// `"table"."name"`
    pub fn column(table: impl Into<String>, name: impl Into<String>) -> Self {
        ExprColumn {
            table: Some(table.into()),
            name: name.into(),
        }
        .into()
    }

    /// `"name"`
    pub fn unqualified(name: impl Into<String>) -> Self {
        ExprColumn {
            table: None,
            name: name.into(),
        }
        .into()
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}
