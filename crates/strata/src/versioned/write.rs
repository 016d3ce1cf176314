use super::{
    is_versioned_class, root_table, versions_table, AUTHOR_ID, RECORD_ID, VERSION, WAS_PUBLISHED,
};
use crate::{extension::Cx, Record, Result};

use strata_core::{
    schema::{app::ClassId, ID},
    Schema,
};
use strata_sql::stmt::{Expr, Manipulation, SqlQuery, TableOp};

/// Stamps the write with a version, snapshots the record into the
/// `_versions` tables and moves the base table operations to the stage
/// being written.
///
/// A record copied between stages with [`Record::migrate_version`] keeps
/// its version and adds no snapshot.
pub(super) fn augment_write(
    cx: &mut Cx<'_>,
    record: &Record,
    mut manipulation: Manipulation,
) -> Result<Manipulation> {
    let schema = cx.schema().clone();
    let class = record.class_id();

    if !is_versioned_class(&schema, class) {
        return Ok(manipulation);
    }

    let suffix = cx.stage().suffix();

    if manipulation.iter().all(|(_, op)| op.is_delete()) {
        if let Some(suffix) = suffix {
            manipulation.map_tables(|table| format!("{table}{suffix}"));
        }
        return Ok(manipulation);
    }

    let id = record.require_id("version")?;

    let version = match record.migrating_version() {
        Some(version) => version,
        None => next_version(cx, &schema, class, id)?,
    };

    manipulation
        .get_or_insert_with(root_table(&schema, class), || TableOp::update(id))
        .set(VERSION, version);

    let mut snapshots = vec![];

    if record.migrating_version().is_none() {
        let root = schema.root(class).table;

        for table in schema.ancestry_tables(class) {
            let mut op = TableOp::insert(None)
                .with_field(RECORD_ID, id)
                .with_field(VERSION, version);

            if table.id == root {
                op.set(WAS_PUBLISHED, false);
                op.set(AUTHOR_ID, cx.author());
            }

            for column in &table.columns {
                if column.name != ID && column.name != VERSION {
                    op.set(column.name.clone(), record.get_field(&column.name)?);
                }
            }

            snapshots.push((versions_table(&table.name), op));
        }
    }

    if let Some(suffix) = suffix {
        manipulation.map_tables(|table| format!("{table}{suffix}"));
    }

    for (table, op) in snapshots {
        manipulation.insert(table, op);
    }

    Ok(manipulation)
}

/// One past the highest version recorded for `id`, starting at 1.
fn next_version(cx: &mut Cx<'_>, schema: &Schema, class: ClassId, id: u64) -> Result<u64> {
    let versions = versions_table(root_table(schema, class));

    let mut query = SqlQuery::new();
    query
        .from(&versions)
        .select(Expr::max(Expr::column(&versions, VERSION)), None)
        .filter(Expr::eq(Expr::column(&versions, RECORD_ID), id));

    let current = cx.query_value(&query)?;
    Ok(current.to_id().unwrap_or(0) + 1)
}

/// Copies the version the write assigned onto the record.
pub(super) fn sync_version(record: &mut Record, manipulation: &Manipulation) {
    let version = manipulation
        .iter()
        .filter(|(table, _)| !table.ends_with("_versions"))
        .find_map(|(_, op)| op.fields.get(VERSION));

    if let Some(version) = version {
        record.set_raw(VERSION, version.clone());
    }
}
