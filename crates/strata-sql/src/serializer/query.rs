use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::{Connective, Direction, Expr, JoinKind, OrderBy, SelectItem, SqlQuery};

impl ToSql for &SqlQuery {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        fmt!(f, "SELECT " distinct);

        if self.select.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, Comma(&self.select));
        }

        for (i, (alias, table_ref)) in self.from.iter().enumerate() {
            let table = Aliased(&table_ref.table, alias);

            match &table_ref.join {
                _ if i == 0 => fmt!(f, " FROM " table),
                Some(join) => {
                    let kind = match join.kind {
                        JoinKind::Inner => " INNER JOIN ",
                        JoinKind::Left => " LEFT JOIN ",
                    };
                    let on = &join.on;
                    fmt!(f, kind table " ON " on);
                }
                None => fmt!(f, ", " table),
            }
        }

        let connective = match self.connective {
            Connective::And => " AND ",
            Connective::Or => " OR ",
        };
        Clause(" WHERE ", &self.filter, connective).to_sql(f);

        if !self.group_by.is_empty() {
            fmt!(f, " GROUP BY " Comma(&self.group_by));
        }

        Clause(" HAVING ", &self.having, " AND ").to_sql(f);

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        if let Some(limit) = &self.limit {
            fmt!(f, " LIMIT " limit.count);
            if limit.offset > 0 {
                fmt!(f, " OFFSET " limit.offset);
            }
        }
    }
}

impl ToSql for &SelectItem {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let expr = &self.expr;
        fmt!(f, expr);
        if let Some(alias) = &self.alias {
            fmt!(f, " AS " Ident(alias));
        }
    }
}

impl ToSql for &OrderBy {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        let expr = &self.expr;
        fmt!(f, expr direction);
    }
}

/// A table reference, aliased when the alias differs from its name
struct Aliased<'a>(&'a String, &'a String);

impl ToSql for Aliased<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(self.0));
        if self.0 != self.1 {
            fmt!(f, " AS " Ident(self.1));
        }
    }
}

/// A predicate list. A single predicate is written as is, several are each
/// parenthesized and joined by the connective.
struct Clause<'a>(&'static str, &'a [Expr], &'static str);

impl ToSql for Clause<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let Clause(keyword, exprs, connective) = self;

        match exprs {
            [] => {}
            [expr] => fmt!(f, keyword expr),
            exprs => {
                fmt!(f, keyword);
                let mut s = "";
                for expr in exprs {
                    fmt!(f, s "(" expr ")");
                    s = connective;
                }
            }
        }
    }
}
