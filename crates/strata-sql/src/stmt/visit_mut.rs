use super::{Expr, SqlQuery};

impl Expr {
    /// Calls `f` on this expression and then on every nested expression.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Expr)) {
        f(self);

        match self {
            Expr::And(operands) | Expr::Or(operands) => {
                for operand in operands {
                    operand.walk_mut(f);
                }
            }
            Expr::BinaryOp(expr) => {
                expr.lhs.walk_mut(f);
                expr.rhs.walk_mut(f);
            }
            Expr::Case(expr) => {
                for (when, then) in &mut expr.when {
                    when.walk_mut(f);
                    then.walk_mut(f);
                }
                expr.otherwise.walk_mut(f);
            }
            Expr::Func(expr) => {
                if let Some(arg) = &mut expr.arg {
                    arg.walk_mut(f);
                }
            }
            Expr::InList(expr) => {
                expr.expr.walk_mut(f);
                for item in &mut expr.list {
                    item.walk_mut(f);
                }
            }
            Expr::IsNull(expr) => expr.expr.walk_mut(f),
            Expr::Not(expr) => expr.walk_mut(f),
            Expr::Column(_) | Expr::Raw(_) | Expr::Star | Expr::Value(_) => {}
        }
    }
}

impl SqlQuery {
    /// Visits every expression of every clause, join conditions included.
    pub fn walk_exprs_mut(&mut self, mut f: impl FnMut(&mut Expr)) {
        for item in &mut self.select {
            item.expr.walk_mut(&mut f);
        }

        for table in self.from.values_mut() {
            if let Some(join) = &mut table.join {
                join.on.walk_mut(&mut f);
            }
        }

        for expr in self
            .filter
            .iter_mut()
            .chain(self.group_by.iter_mut())
            .chain(self.having.iter_mut())
        {
            expr.walk_mut(&mut f);
        }

        for order_by in &mut self.order_by {
            order_by.expr.walk_mut(&mut f);
        }
    }
}
