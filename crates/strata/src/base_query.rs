//! Builds the `SELECT` every read of a class starts from.

use crate::Result;

use indexmap::IndexMap;
use std::cmp::Reverse;
use strata_core::{
    schema::{app::ClassId, db::Table, CLASS_NAME, ID},
    Error, Schema,
};
use strata_sql::stmt::{Direction, Expr, SqlQuery};

/// Anchors on the root table and left-joins every other table level of
/// `class`'s ancestry and descendants on `ID`.
///
/// A column stored at more than one level is projected through a `CASE`
/// on the discriminator so each row yields the value of its own class.
/// When `restrict` is set and `class` is not a root, rows are limited to
/// `class` and its subclasses.
pub(crate) fn build(schema: &Schema, class: ClassId, restrict: bool) -> SqlQuery {
    let root = schema.root(class);
    let root_table = schema.table(root.table);

    let mut descendants = schema.class(class).descendants.clone();
    descendants.sort_by_key(|id| schema.class(*id).ancestry.len());

    let tables = schema
        .ancestry_tables(class)
        .chain(descendants.iter().map(|id| schema.table(schema.class(*id).table)))
        .collect::<Vec<_>>();

    let mut query = SqlQuery::new();
    query.from(&root_table.name);

    for table in &tables[1..] {
        query.left_join(
            &table.name,
            Expr::eq(
                Expr::column(&table.name, ID),
                Expr::column(&root_table.name, ID),
            ),
        );
    }

    query.select_column(&root_table.name, ID);

    let mut owners: IndexMap<&str, Vec<&Table>> = IndexMap::new();

    for &table in &tables {
        for column in &table.columns {
            if column.name != ID {
                owners.entry(&column.name).or_default().push(table);
            }
        }
    }

    for (column, mut owned_by) in owners {
        if let [table] = owned_by[..] {
            query.select_column(&table.name, column);
            continue;
        }

        owned_by.sort_by_key(|table| Reverse(depth(schema, table)));

        let when = owned_by
            .iter()
            .filter_map(|table| {
                let owner = table.class()?;
                let names = schema
                    .subclasses(owner)
                    .map(|class| class.name.clone())
                    .collect::<Vec<_>>();

                Some((
                    Expr::in_list(Expr::column(&root_table.name, CLASS_NAME), names),
                    Expr::column(&table.name, column),
                ))
            })
            .collect();

        query.select(Expr::case(when, Expr::null()), Some(column));
    }

    if restrict && !schema.class(class).is_root() {
        let names = schema
            .subclasses(class)
            .map(|class| class.name.clone())
            .collect::<Vec<_>>();

        query.filter(Expr::in_list(
            Expr::column(&root_table.name, CLASS_NAME),
            names,
        ));
    }

    query.order_by(Expr::column(&root_table.name, ID), Direction::Asc);
    query
}

fn depth(schema: &Schema, table: &Table) -> usize {
    table
        .class()
        .map(|class| schema.class(class).ancestry.len())
        .unwrap_or(0)
}

/// `"Root"."ID"` for `class`'s hierarchy.
pub(crate) fn id_column(schema: &Schema, class: ClassId) -> Expr {
    let root = schema.root(class);
    Expr::column(&schema.table(root.table).name, ID)
}

/// The column holding `field` for records of `class`.
pub(crate) fn field_column(schema: &Schema, class: ClassId, field: &str) -> Result<Expr> {
    let table = schema
        .table_for_field(class, field)
        .ok_or_else(|| Error::unknown_field(&schema.class(class).name, field))?;

    Ok(Expr::column(&table.name, field))
}
