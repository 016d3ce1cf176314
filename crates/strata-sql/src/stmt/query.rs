use super::*;
use crate::Serializer;

use indexmap::IndexMap;

/// A `SELECT` statement under construction.
///
/// Queries are built with the `&mut Self` methods below, handed to query
/// interceptors which may rewrite any clause, and finally rendered by the
/// [`Serializer`]. Table references are keyed by alias so that interceptors
/// can swap the physical table behind an alias without touching the
/// expressions that reference it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlQuery {
    pub select: Vec<SelectItem>,

    /// Table references keyed by alias. The first entry is the anchor table.
    pub from: IndexMap<String, TableRef>,

    /// `WHERE` predicates, combined by `connective`
    pub filter: Vec<Expr>,

    pub connective: Connective,

    pub group_by: Vec<Expr>,

    /// `HAVING` predicates, always combined with AND
    pub having: Vec<Expr>,

    pub order_by: Vec<OrderBy>,

    pub limit: Option<Limit>,

    pub distinct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    /// Physical table name
    pub table: String,

    /// `None` for the anchor table and for plain cross joins
    pub join: Option<Join>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub on: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connective {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expr: Expr,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: u64,
    pub count: u64,
}

impl SqlQuery {
    pub fn new() -> SqlQuery {
        SqlQuery::default()
    }

    /// Adds `table` to the `FROM` clause, aliased by its own name.
    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        let table = table.into();
        self.from_as(table.clone(), table)
    }

    pub fn from_as(&mut self, table: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.from.insert(
            alias.into(),
            TableRef {
                table: table.into(),
                join: None,
            },
        );
        self
    }

    pub fn left_join(&mut self, table: impl Into<String>, on: impl Into<Expr>) -> &mut Self {
        let table = table.into();
        self.left_join_as(table.clone(), table, on)
    }

    pub fn left_join_as(
        &mut self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<Expr>,
    ) -> &mut Self {
        self.join_as(JoinKind::Left, table.into(), alias.into(), on.into())
    }

    pub fn inner_join_as(
        &mut self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<Expr>,
    ) -> &mut Self {
        self.join_as(JoinKind::Inner, table.into(), alias.into(), on.into())
    }

    fn join_as(&mut self, kind: JoinKind, table: String, alias: String, on: Expr) -> &mut Self {
        self.from.insert(
            alias,
            TableRef {
                table,
                join: Some(Join { kind, on }),
            },
        );
        self
    }

    /// Points `alias` at a different physical table. Returns `false` when
    /// the query has no such alias.
    pub fn rename_table(&mut self, alias: &str, physical: impl Into<String>) -> bool {
        match self.from.get_mut(alias) {
            Some(table_ref) => {
                table_ref.table = physical.into();
                true
            }
            None => false,
        }
    }

    /// The alias of the first `FROM` entry.
    pub fn anchor(&self) -> Option<&str> {
        self.from.keys().next().map(String::as_str)
    }

    pub fn select(&mut self, expr: impl Into<Expr>, alias: Option<&str>) -> &mut Self {
        self.select.push(SelectItem {
            expr: expr.into(),
            alias: alias.map(str::to_string),
        });
        self
    }

    /// Selects `"table"."column"` under its own name.
    pub fn select_column(&mut self, table: &str, column: &str) -> &mut Self {
        self.select(Expr::column(table, column), None)
    }

    pub fn clear_select(&mut self) -> &mut Self {
        self.select.clear();
        self
    }

    pub fn filter(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.filter.push(expr.into());
        self
    }

    /// Combine `WHERE` predicates with OR.
    pub fn use_disjunction(&mut self) -> &mut Self {
        self.connective = Connective::Or;
        self
    }

    pub fn use_conjunction(&mut self) -> &mut Self {
        self.connective = Connective::And;
        self
    }

    pub fn group_by(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn having(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.having.push(expr.into());
        self
    }

    pub fn order_by(&mut self, expr: impl Into<Expr>, direction: Direction) -> &mut Self {
        self.order_by.push(OrderBy {
            expr: expr.into(),
            direction,
        });
        self
    }

    pub fn clear_order_by(&mut self) -> &mut Self {
        self.order_by.clear();
        self
    }

    pub fn limit(&mut self, count: u64) -> &mut Self {
        self.limit_offset(count, 0)
    }

    pub fn limit_offset(&mut self, count: u64, offset: u64) -> &mut Self {
        self.limit = Some(Limit { offset, count });
        self
    }

    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self
    }

    /// Counts the rows the query would return without its limit.
    ///
    /// Ordering and grouping are dropped. The count is taken over
    /// `DISTINCT column` so joins that fan out rows do not inflate it.
    pub fn to_count_query(&self, column: Expr) -> SqlQuery {
        let mut query = self.clone();
        query.limit = None;
        query.order_by.clear();
        query.group_by.clear();
        query.having.clear();
        query.select.clear();
        query.distinct = false;

        let count = if self.distinct || self.from.len() > 1 {
            Expr::count_distinct(column)
        } else {
            Expr::count(column)
        };

        query.select(count, Some("count"));
        query
    }

    /// Renders the query as SQLite SQL.
    ///
    /// # Panics
    ///
    /// Panics when no table has been added to the query.
    pub fn render(&self) -> String {
        assert!(!self.from.is_empty(), "query has no FROM clause");
        Serializer::sqlite().serialize_query(self)
    }
}

impl From<SqlQuery> for Statement {
    fn from(value: SqlQuery) -> Self {
        Statement::Query(value)
    }
}
