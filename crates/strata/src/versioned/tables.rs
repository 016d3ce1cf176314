use super::{AUTHOR_ID, RECORD_ID, VERSION, WAS_PUBLISHED};

use strata_core::schema::{
    app::ColumnType,
    db::{Column, Table},
    ID,
};

/// `{T}_Live`: same shape as the base table.
pub(super) fn live(table: &Table) -> Table {
    let mut live = table.shadow(format!("{}_Live", table.name));
    live.columns = table.columns.clone();
    live.primary_key = table.primary_key.clone();

    for index in &table.indices {
        live.push_index(index.columns.clone(), index.unique);
    }

    live
}

/// `{T}_versions`: keyed by `(RecordID, Version)`, carrying every column of
/// the base table except its id.
pub(super) fn versions(table: &Table, is_root: bool) -> Table {
    let mut versions = table.shadow(super::versions_table(&table.name));

    versions.columns.push(Column::shared_id(RECORD_ID));
    versions.columns.push(Column::shared_id(VERSION));

    if is_root {
        versions
            .columns
            .push(Column::new(WAS_PUBLISHED, ColumnType::Boolean));
        versions
            .columns
            .push(Column::new(AUTHOR_ID, ColumnType::ForeignKey));
    }

    for column in &table.columns {
        if column.name == ID || column.name == VERSION {
            continue;
        }

        versions.columns.push(Column {
            primary_key: false,
            auto_increment: false,
            ..column.clone()
        });
    }

    versions.primary_key = vec![RECORD_ID.to_string(), VERSION.to_string()];
    versions.push_index(vec![RECORD_ID.to_string()], false);

    if is_root {
        versions.push_index(vec![AUTHOR_ID.to_string()], false);
    }

    versions
}
