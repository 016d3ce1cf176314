use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    pub func: Func,

    /// `None` renders as `*`
    pub arg: Option<Box<Expr>>,

    pub distinct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Count,
    Max,
    Min,
    Sum,
}

impl Expr {
    pub fn func(func: Func, arg: impl Into<Self>) -> Self {
        ExprFunc {
            func,
            arg: Some(Box::new(arg.into())),
            distinct: false,
        }
        .into()
    }

    pub fn count_star() -> Self {
        ExprFunc {
            func: Func::Count,
            arg: None,
            distinct: false,
        }
        .into()
    }

    pub fn count(arg: impl Into<Self>) -> Self {
        Expr::func(Func::Count, arg)
    }

    pub fn count_distinct(arg: impl Into<Self>) -> Self {
        ExprFunc {
            func: Func::Count,
            arg: Some(Box::new(arg.into())),
            distinct: true,
        }
        .into()
    }

    pub fn max(arg: impl Into<Self>) -> Self {
        Expr::func(Func::Max, arg)
    }

    pub fn min(arg: impl Into<Self>) -> Self {
        Expr::func(Func::Min, arg)
    }

    pub fn sum(arg: impl Into<Self>) -> Self {
        Expr::func(Func::Sum, arg)
    }
}

impl Func {
    pub fn as_sql(self) -> &'static str {
        match self {
            Func::Count => "COUNT",
            Func::Max => "MAX",
            Func::Min => "MIN",
            Func::Sum => "SUM",
        }
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}
