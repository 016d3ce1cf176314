use super::Record;
use crate::{Db, Result};

use strata_core::Error;
use strata_sql::stmt::{Manipulation, TableOp};

impl Record {
    /// Removes the record's row from every table of its ancestry.
    ///
    /// `has_many` children are kept with their foreign key cleared, and the
    /// record's many-many join rows are removed. Fails with a not-found
    /// error when no row was deleted.
    pub fn delete(&mut self, db: &mut Db) -> Result<()> {
        let id = self.require_id("delete")?;

        if db.context().is_archived() {
            return Err(Error::invalid_statement(format!(
                "cannot delete `{}` while reading archived data",
                self.class_name()
            )));
        }

        db.transaction(|db| {
            self.detach_relations(db)?;

            if self.delete_rows(db)? == 0 {
                return Err(Error::record_not_found(format!(
                    "class={} id={id}",
                    self.class_name()
                )));
            }

            Ok(())
        })?;

        let shared = db.shared.clone();

        for extension in &shared.extensions {
            extension.on_after_delete(&mut db.cx(), self)?;
        }

        for hooks in shared.hooks_for(self.class) {
            hooks.on_after_delete(db, self)?;
        }

        self.id = None;
        Ok(())
    }

    fn detach_relations(&self, db: &mut Db) -> Result<()> {
        let schema = self.schema.clone();

        for relation in schema.relations(self.class) {
            if relation.is_list() {
                self.relation_list(relation.name())?.remove_all(db)?;
            }
        }

        Ok(())
    }

    /// Deletes the ancestry rows in the current stage, returning the number
    /// of rows removed.
    pub(crate) fn delete_rows(&self, db: &mut Db) -> Result<u64> {
        let id = self.require_id("delete")?;

        let mut manipulation = Manipulation::new();

        for table in self.schema.ancestry_tables(self.class) {
            manipulation.insert(table.name.clone(), TableOp::delete(id));
        }

        let shared = db.shared.clone();

        for extension in &shared.extensions {
            manipulation = extension.augment_write(&mut db.cx(), self, manipulation)?;
        }

        super::execute(db, &manipulation)
    }

    pub(crate) fn require_id(&self, action: &str) -> Result<u64> {
        self.id.ok_or_else(|| {
            Error::invalid_statement(format!(
                "cannot {action} `{}`: record has not been written",
                self.class_name()
            ))
        })
    }
}
