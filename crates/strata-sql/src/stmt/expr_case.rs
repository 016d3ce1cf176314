use super::Expr;

/// `CASE WHEN cond THEN result .. ELSE otherwise END`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCase {
    pub when: Vec<(Expr, Expr)>,
    pub otherwise: Box<Expr>,
}

impl Expr {
    pub fn case(when: Vec<(Expr, Expr)>, otherwise: impl Into<Self>) -> Self {
        ExprCase {
            when,
            otherwise: Box::new(otherwise.into()),
        }
        .into()
    }
}

impl From<ExprCase> for Expr {
    fn from(value: ExprCase) -> Self {
        Self::Case(value)
    }
}
