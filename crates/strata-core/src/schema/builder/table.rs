use super::BuildSchema;
use crate::{
    schema::{
        app::{ColumnType, Relation},
        db::{Column, Table, TableId, TableKind},
        CLASS_NAME, CREATED, ID, LAST_EDITED,
    },
    Error, Result,
};

impl BuildSchema {
    /// One table per class, named after the class. Root tables own the
    /// auto-increment key and the system columns; every other level shares
    /// the root's `ID`.
    pub(super) fn build_class_tables(&mut self) -> Result<()> {
        for class in &self.classes {
            let mut table = Table {
                id: TableId(self.tables.len()),
                name: class.name.clone(),
                kind: TableKind::Class(class.id),
                columns: vec![],
                primary_key: vec![ID.to_string()],
                indices: vec![],
            };
            debug_assert_eq!(table.id, class.table);

            if class.is_root() {
                table.columns.push(Column::auto_increment_id(ID));
                table.columns.push(Column::new(
                    CLASS_NAME,
                    class.database_fields[CLASS_NAME].clone(),
                ));
                table.columns.push(Column::new(CREATED, ColumnType::Timestamp));
                table.columns.push(Column::new(LAST_EDITED, ColumnType::Timestamp));
                table.push_index(vec![CLASS_NAME.to_string()], false);
            } else {
                table.columns.push(Column::shared_id(ID));
            }

            for (name, ty) in &class.fields {
                table.columns.push(Column::new(name.clone(), ty.clone()));

                if *ty == ColumnType::ForeignKey {
                    table.push_index(vec![name.clone()], false);
                }
            }

            for index in &self.defs[class.id.0].indices {
                if let Some(missing) = index.columns.iter().find(|c| !table.has_column(c)) {
                    return Err(Error::invalid_schema(format!(
                        "index on `{}` names unknown column `{missing}`",
                        class.name
                    )));
                }
                table.push_index(index.columns.clone(), index.unique);
            }

            self.tables.push(table);
        }

        Ok(())
    }

    /// One join table per declared (not reverse) many-many relation.
    pub(super) fn build_join_tables(&mut self) {
        let relations = self
            .classes
            .iter()
            .flat_map(|class| class.relations.values())
            .filter_map(Relation::as_many_many)
            .filter(|rel| !rel.reverse)
            .cloned()
            .collect::<Vec<_>>();

        for rel in relations {
            let mut table = Table {
                id: TableId(self.tables.len()),
                name: rel.join_table.clone(),
                kind: TableKind::Join { owner: rel.owner },
                columns: vec![
                    Column::auto_increment_id(ID),
                    Column::new(rel.local_key.clone(), ColumnType::ForeignKey),
                    Column::new(rel.foreign_key.clone(), ColumnType::ForeignKey),
                ],
                primary_key: vec![ID.to_string()],
                indices: vec![],
            };

            for (name, ty) in &rel.extra_fields {
                table.columns.push(Column::new(name.clone(), ty.clone()));
            }

            table.push_index(vec![rel.local_key.clone()], false);
            table.push_index(vec![rel.foreign_key.clone()], false);

            self.tables.push(table);
        }
    }
}
