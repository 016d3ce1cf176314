use super::{app::ColumnType, Schema};
use crate::{Error, Result};

use std::collections::HashSet;

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        debug_assert!(self.verify_ancestry_ends_at_root());
        debug_assert!(self.verify_each_table_has_primary_key());
        debug_assert!(self.verify_foreign_keys_are_indexed());

        self.verify_index_names_are_unique()?;
        self.verify_defaults_coerce()?;
        Ok(())
    }

    fn verify_ancestry_ends_at_root(&self) -> bool {
        for class in &self.schema.classes {
            let root = self.schema.class(class.ancestry[0]);
            assert!(root.is_root(), "class `{}` does not reach a root", class.name);
            assert_eq!(class.ancestry.last(), Some(&class.id));
        }
        true
    }

    fn verify_each_table_has_primary_key(&self) -> bool {
        for table in &self.schema.tables {
            assert!(!table.primary_key.is_empty(), "table `{}`", table.name);
            for column in &table.primary_key {
                assert!(table.has_column(column), "table `{}`", table.name);
            }
        }
        true
    }

    fn verify_foreign_keys_are_indexed(&self) -> bool {
        for table in &self.schema.tables {
            for column in &table.columns {
                if column.ty == ColumnType::ForeignKey {
                    assert!(
                        table
                            .indices
                            .iter()
                            .any(|index| index.columns.first() == Some(&column.name)),
                        "foreign key `{}`.`{}` is not indexed",
                        table.name,
                        column.name
                    );
                }
            }
        }
        true
    }

    /// SQLite keeps index names in one namespace per database.
    fn verify_index_names_are_unique(&self) -> Result<()> {
        let mut names = HashSet::new();

        for table in &self.schema.tables {
            for index in &table.indices {
                if !names.insert(&index.name) {
                    return Err(Error::invalid_schema(format!(
                        "duplicate index name `{}`",
                        index.name
                    )));
                }
            }
        }

        Ok(())
    }

    fn verify_defaults_coerce(&self) -> Result<()> {
        for class in &self.schema.classes {
            for (name, value) in &class.defaults {
                class.database_fields[name]
                    .coerce(value.clone())
                    .map_err(|err| {
                        err.context(Error::invalid_schema(format!(
                            "default for `{}`.`{name}`",
                            class.name
                        )))
                    })?;
            }
        }
        Ok(())
    }
}
