use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(Vec<Expr>),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// `CASE WHEN .. THEN .. ELSE .. END`
    Case(ExprCase),

    /// References a column, optionally qualified by a table alias
    Column(ExprColumn),

    /// Aggregate function call
    Func(ExprFunc),

    /// In list
    InList(ExprInList),

    /// Whether an expression is (or is not) null. This is different from a
    /// binary expression because of how databases treat null comparisons.
    IsNull(ExprIsNull),

    /// Negates an expression
    Not(Box<Expr>),

    /// OR a set of expressions
    Or(Vec<Expr>),

    /// SQL text emitted verbatim
    Raw(String),

    /// `*`
    Star,

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Joins two expressions with AND, flattening nested conjunctions.
    pub fn and(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut operands = vec![];
        for expr in [lhs.into(), rhs.into()] {
            match expr {
                Self::And(nested) => operands.extend(nested),
                expr => operands.push(expr),
            }
        }
        Self::And(operands)
    }

    /// Joins the expressions with AND. A single expression is returned as is
    /// and an empty list becomes a true literal.
    pub fn and_from_vec(mut operands: Vec<Self>) -> Self {
        match operands.len() {
            0 => Self::Value(Value::Bool(true)),
            1 => operands.swap_remove(0),
            _ => Self::And(operands),
        }
    }

    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut operands = vec![];
        for expr in [lhs.into(), rhs.into()] {
            match expr {
                Self::Or(nested) => operands.extend(nested),
                expr => operands.push(expr),
            }
        }
        Self::Or(operands)
    }

    pub fn or_from_vec(mut operands: Vec<Self>) -> Self {
        match operands.len() {
            0 => Self::Value(Value::Bool(false)),
            1 => operands.swap_remove(0),
            _ => Self::Or(operands),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: impl Into<Self>) -> Self {
        Self::Not(Box::new(expr.into()))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn as_column(&self) -> Option<&ExprColumn> {
        match self {
            Self::Column(column) => Some(column),
            _ => None,
        }
    }

    /// Whether the expression must be parenthesized when it is an operand.
    pub(crate) fn is_compound(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<u64> for Expr {
    fn from(value: u64) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

/// String literals become values, never column references.
impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}
