use super::{root_table, versioned_class, versions_table, RECORD_ID, VERSION};
use crate::{extension::Cx, Result};

use chrono::NaiveDateTime;
use std::{collections::HashSet, mem};
use strata_core::{
    schema::{ID, LAST_EDITED},
    stmt::Value,
    Schema,
};
use strata_sql::stmt::{Expr, SqlQuery, Statement};

pub(super) fn augment_sql(cx: &mut Cx<'_>, mut query: SqlQuery) -> Result<SqlQuery> {
    let schema = cx.schema().clone();
    let aliases = versioned_aliases(&schema, &query);

    if aliases.is_empty() {
        return Ok(query);
    }

    if let Some(at) = cx.archived() {
        return archived_query(cx, query, at);
    }

    if let Some(suffix) = cx.stage().suffix() {
        for alias in &aliases {
            if let Some(table_ref) = query.from.get_mut(alias) {
                table_ref.table.push_str(suffix);
            }
        }
    }

    Ok(query)
}

/// Aliases of `query` that point at the base table of a versioned class.
fn versioned_aliases(schema: &Schema, query: &SqlQuery) -> HashSet<String> {
    query
        .from
        .iter()
        .filter(|(_, table_ref)| versioned_class(schema, &table_ref.table).is_some())
        .map(|(alias, _)| alias.clone())
        .collect()
}

/// Points a base query at the `_versions` tables.
///
/// `ID` references become `RecordID`, still selected as `ID`, and every
/// joined table level is pinned to the anchor's version. Queries not
/// anchored on a versioned table are returned unchanged.
pub(super) fn versions_query(schema: &Schema, mut query: SqlQuery) -> SqlQuery {
    let Some(anchor) = query.anchor().map(str::to_string) else {
        return query;
    };

    let anchor_is_versioned = query
        .from
        .get(&anchor)
        .is_some_and(|table_ref| versioned_class(schema, &table_ref.table).is_some());

    if !anchor_is_versioned {
        return query;
    }

    let aliases = versioned_aliases(schema, &query);
    let is_versioned_id = |expr: &Expr| match expr {
        Expr::Column(column) => {
            column.name == ID
                && column
                    .table
                    .as_ref()
                    .is_some_and(|table| aliases.contains(table))
        }
        _ => false,
    };

    for item in &mut query.select {
        if item.alias.is_none() && is_versioned_id(&item.expr) {
            item.alias = Some(ID.to_string());
        }
    }

    for (alias, table_ref) in &mut query.from {
        if !aliases.contains(alias) {
            continue;
        }

        table_ref.table = versions_table(&table_ref.table);

        if let Some(join) = &mut table_ref.join {
            let on = mem::replace(&mut join.on, Expr::null());
            join.on = Expr::and(
                on,
                Expr::eq(Expr::column(alias, VERSION), Expr::column(&anchor, VERSION)),
            );
        }
    }

    query.walk_exprs_mut(|expr| {
        if is_versioned_id(&*expr) {
            if let Expr::Column(column) = expr {
                column.name = RECORD_ID.to_string();
            }
        }
    });

    query
}

/// Reads each record as its latest version written at or before `at`.
///
/// The `(ID, Version)` pairs are computed once per root table and timestamp
/// into a temporary table that lives as long as the connection.
fn archived_query(cx: &mut Cx<'_>, query: SqlQuery, at: NaiveDateTime) -> Result<SqlQuery> {
    let schema = cx.schema().clone();

    let Some(anchor) = query.anchor().map(str::to_string) else {
        return Ok(query);
    };

    let Some(class) = query
        .from
        .get(&anchor)
        .and_then(|table_ref| versioned_class(&schema, &table_ref.table))
    else {
        return Ok(query);
    };

    let root = root_table(&schema, class.id);
    let pin = format!("_Archive_{root}_{}", at.format("%Y%m%d%H%M%S"));

    if cx.memoize(pin.clone()) {
        let versions = versions_table(root);

        let mut latest = SqlQuery::new();
        latest
            .from(&versions)
            .select(Expr::column(&versions, RECORD_ID), Some(ID))
            .select(Expr::max(Expr::column(&versions, VERSION)), Some(VERSION))
            .filter(Expr::le(
                Expr::column(&versions, LAST_EDITED),
                Value::from(at),
            ))
            .group_by(Expr::column(&versions, RECORD_ID));

        cx.exec(&Statement::create_temporary_table_as(&pin, latest))?;
    }

    let mut query = versions_query(&schema, query);
    query.inner_join_as(
        &pin,
        &pin,
        Expr::and(
            Expr::eq(Expr::column(&pin, ID), Expr::column(&anchor, RECORD_ID)),
            Expr::eq(Expr::column(&pin, VERSION), Expr::column(&anchor, VERSION)),
        ),
    );

    Ok(query)
}
