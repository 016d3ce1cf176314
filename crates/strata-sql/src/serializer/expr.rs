use super::{Comma, Formatter, Ident, Period, ToSql};

use crate::stmt::{self, Expr};

impl ToSql for &Expr {
    fn to_sql(self, f: &mut Formatter<'_>) {
        use Expr::*;

        match self {
            And(operands) => Delimited(operands, " AND ").to_sql(f),
            BinaryOp(expr) => {
                let lhs = Operand(&expr.lhs);
                let rhs = Operand(&expr.rhs);

                // `= NULL` never matches, compare with IS instead
                match (expr.op, &*expr.rhs) {
                    (stmt::BinaryOp::Eq, Value(stmt::Value::Null)) => fmt!(f, lhs " IS NULL"),
                    (stmt::BinaryOp::Ne, Value(stmt::Value::Null)) => {
                        fmt!(f, lhs " IS NOT NULL")
                    }
                    (op, _) => fmt!(f, lhs " " op.as_sql() " " rhs),
                }
            }
            Case(expr) => {
                fmt!(f, "CASE");
                for (when, then) in &expr.when {
                    fmt!(f, " WHEN " when " THEN " then);
                }
                let otherwise = &*expr.otherwise;
                fmt!(f, " ELSE " otherwise " END");
            }
            Column(column) => column.to_sql(f),
            Func(expr) => {
                let distinct = if expr.distinct { "DISTINCT " } else { "" };
                fmt!(f, expr.func.as_sql() "(" distinct);
                match &expr.arg {
                    Some(arg) => {
                        let arg: &Expr = arg;
                        fmt!(f, arg);
                    }
                    None => fmt!(f, "*"),
                }
                fmt!(f, ")");
            }
            InList(expr) if expr.list.is_empty() => {
                // Nothing is in an empty list
                fmt!(f, if expr.negate { "1 = 1" } else { "1 = 0" });
            }
            InList(expr) => {
                let not = if expr.negate { " NOT" } else { "" };
                fmt!(f, Operand(&expr.expr) not " IN (" Comma(&expr.list) ")");
            }
            IsNull(expr) => {
                let not = if expr.negate { " NOT" } else { "" };
                fmt!(f, Operand(&expr.expr) " IS" not " NULL");
            }
            Not(expr) => {
                let expr = &**expr;
                fmt!(f, "NOT (" expr ")");
            }
            Or(operands) => Delimited(operands, " OR ").to_sql(f),
            Raw(sql) => fmt!(f, sql),
            Star => fmt!(f, "*"),
            Value(value) => value.to_sql(f),
        }
    }
}

impl ToSql for &stmt::ExprColumn {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match &self.table {
            Some(table) => fmt!(f, Period([Ident(table), Ident(&self.name)])),
            None => fmt!(f, Ident(&self.name)),
        }
    }
}

/// Parenthesizes AND / OR groups nested in another expression.
struct Operand<'a>(&'a Expr);

impl ToSql for Operand<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.0.is_compound() {
            fmt!(f, "(" self.0 ")");
        } else {
            self.0.to_sql(f);
        }
    }
}

/// Operands joined by a connective keyword
struct Delimited<'a>(&'a [Expr], &'static str);

impl ToSql for Delimited<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let mut s = "";
        for operand in self.0 {
            fmt!(f, s Operand(operand));
            s = self.1;
        }
    }
}
