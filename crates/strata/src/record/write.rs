use super::{ChangeLevel, Record};
use crate::{Db, Result, ValidationResult};

use strata_core::{
    schema::{CLASS_NAME, CREATED, ID, LAST_EDITED},
    Error,
};
use strata_sql::stmt::{Insert, Manipulation, TableOp};

impl Record {
    /// Validates and saves the record, returning its id.
    ///
    /// A record that is already stored and has no field changed in value is
    /// not written; only the skipped-write hooks run.
    pub fn write(&mut self, db: &mut Db) -> Result<u64> {
        if let Some(at) = db.context().archived {
            return Err(Error::invalid_statement(format!(
                "cannot write `{}` while reading archived data as of {at}",
                self.class_name()
            )));
        }

        let shared = db.shared.clone();
        let hooks = shared.hooks_for(self.class);

        let mut validation = ValidationResult::valid();
        for hooks in &hooks {
            validation.combine(hooks.validate(self));
        }

        if !validation.is_valid() {
            return Err(Error::validation(validation));
        }

        for hooks in &hooks {
            hooks.on_before_write(db, self)?;
        }

        for extension in &shared.extensions {
            extension.on_before_write(&mut db.cx(), self)?;
        }

        if let Some(id) = self.id {
            if self.changed_fields(ChangeLevel::Value).is_empty() {
                tracing::debug!(class = self.class_name(), id, "nothing changed; skipping write");

                for extension in &shared.extensions {
                    extension.on_after_skipped_write(&mut db.cx(), self)?;
                }

                for hooks in &hooks {
                    hooks.on_after_skipped_write(db, self)?;
                }

                self.clear_migrating_version();
                return Ok(id);
            }
        }

        let is_new = self.id.is_none();
        let now = db.now();
        let before = self.clone();

        if self.migrating_version.is_none() || self.get_field(LAST_EDITED)?.is_null() {
            self.set_field(LAST_EDITED, now)?;
        }

        if is_new && self.get_field(CREATED)?.is_null() {
            self.set_field(CREATED, now)?;
        }

        let manipulation = match db.transaction(|db| self.write_rows(db, is_new)) {
            Ok(manipulation) => manipulation,
            Err(err) => {
                // Timestamps, change marks and a freshly allocated id are
                // only kept once the rows are stored.
                *self = before;
                return Err(err);
            }
        };

        let id = self.id.ok_or_else(|| {
            Error::invalid_result(format!("write of `{}` produced no id", self.class_name()))
        })?;

        self.stage = db.context().stage;
        self.mark_clean();

        for extension in &shared.extensions {
            extension.on_after_write(&mut db.cx(), self, &manipulation)?;
        }

        for hooks in &hooks {
            hooks.on_after_write(db, self)?;
        }

        self.clear_migrating_version();
        Ok(id)
    }

    /// Marks every field changed, then writes.
    pub fn force_write(&mut self, db: &mut Db) -> Result<u64> {
        self.force_change();
        self.write(db)
    }

    /// Allocates the id of a new record, then builds and runs one operation
    /// per ancestry table.
    fn write_rows(&mut self, db: &mut Db, is_new: bool) -> Result<Manipulation> {
        let schema = self.schema.clone();
        let root = schema.root(self.class);
        let root_table = &schema.table(root.table).name;

        if is_new {
            let insert = Insert::new(root_table)
                .value(CLASS_NAME, self.get_field(CLASS_NAME)?)
                .value(CREATED, self.get_field(CREATED)?);

            let mut cx = db.cx();
            cx.exec(&insert.into())?;
            self.id = Some(cx.last_insert_id()?);
        }

        let id = self.id.ok_or_else(|| {
            Error::invalid_statement(format!("`{}` has no id to write", self.class_name()))
        })?;

        let mut manipulation = Manipulation::new();

        for table in schema.ancestry_tables(self.class) {
            let mut op = if is_new && table.id != root.table {
                TableOp::insert(Some(id))
            } else {
                TableOp::update(id)
            };

            for column in &table.columns {
                let always = is_new && (column.name == CLASS_NAME || column.name == CREATED);

                if column.name != ID && (always || self.is_changed(&column.name, ChangeLevel::Type)) {
                    op.set(column.name.clone(), self.get_field(&column.name)?);
                }
            }

            manipulation.insert(table.name.clone(), op);
        }

        let shared = db.shared.clone();

        for extension in &shared.extensions {
            manipulation = extension.augment_write(&mut db.cx(), self, manipulation)?;
        }

        execute(db, &manipulation)?;
        Ok(manipulation)
    }
}

/// Runs every operation of `manipulation` in order and returns the total
/// number of affected rows.
///
/// Updates with nothing to set are skipped. An update that matches no row
/// inserts it instead; stage tables only receive a row once a record is
/// first written to them.
pub(crate) fn execute(db: &mut Db, manipulation: &Manipulation) -> Result<u64> {
    let mut cx = db.cx();
    let mut total = 0;

    for (table, op) in manipulation {
        if op.is_update() && op.fields.is_empty() {
            continue;
        }

        let count = cx.exec(&op.to_statement(table)?)?;

        total += if op.is_update() && count == 0 {
            cx.exec(&op.to_insert(table).into())?
        } else {
            count
        };
    }

    Ok(total)
}
