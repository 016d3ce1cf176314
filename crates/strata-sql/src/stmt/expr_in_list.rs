use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Expr>,

    /// `NOT IN`
    pub negate: bool,
}

impl Expr {
    pub fn in_list<I>(expr: impl Into<Self>, list: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        ExprInList {
            expr: Box::new(expr.into()),
            list: list.into_iter().map(Into::into).collect(),
            negate: false,
        }
        .into()
    }

    pub fn not_in_list<I>(expr: impl Into<Self>, list: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        ExprInList {
            expr: Box::new(expr.into()),
            list: list.into_iter().map(Into::into).collect(),
            negate: true,
        }
        .into()
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Self {
        Self::InList(value)
    }
}
