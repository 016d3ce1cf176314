mod delete;
mod hydrate;
mod write;

pub(crate) use write::execute;

use crate::{Model, Result, Stage};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};
use strata_core::{
    schema::{app::ClassId, CLASS_NAME, ID},
    stmt::Value,
    Error, Schema,
};

/// An active record: one row of a class hierarchy, spread over the tables
/// of its ancestry.
///
/// Fields are read and written by column name. Every assignment is
/// recorded in a change set with two levels: [`ChangeLevel::Type`] when a
/// field was assigned at all, [`ChangeLevel::Value`] when the assignment
/// changed its value. Writes send the former and are skipped when nothing
/// reached the latter.
#[derive(Clone)]
pub struct Record {
    schema: Arc<Schema>,
    class: ClassId,
    id: Option<u64>,

    /// Current values, keyed by column. Never contains `ID`.
    fields: IndexMap<String, Value>,

    /// Values as last loaded or written
    original: IndexMap<String, Value>,

    changed: IndexMap<String, ChangeLevel>,

    /// Stage the record was read from or last written to
    stage: Stage,

    /// Set while copying an existing version between stages
    migrating_version: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeLevel {
    /// The field was assigned
    Type,

    /// The field was assigned a different value
    Value,
}

impl Record {
    /// An unsaved record of `class` with every field at its zero value.
    pub fn new(schema: Arc<Schema>, class: impl Into<ClassId>) -> Record {
        let class = class.into();

        let fields = {
            let def = schema.class(class);
            let mut fields = IndexMap::new();

            for (name, ty) in &def.database_fields {
                if name != ID {
                    fields.insert(name.clone(), ty.coerce(Value::Null).unwrap_or_default());
                }
            }

            fields.insert(CLASS_NAME.to_string(), Value::from(&def.name));
            fields
        };

        Record {
            schema,
            class,
            id: None,
            fields,
            original: IndexMap::new(),
            changed: IndexMap::new(),
            stage: Stage::Draft,
            migrating_version: None,
        }
    }

    pub(crate) fn apply_defaults(&mut self) -> Result<()> {
        let schema = self.schema.clone();

        for (name, value) in &schema.class(self.class).defaults {
            self.set_field(name, value.clone())?;
        }

        Ok(())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn class_id(&self) -> ClassId {
        self.class
    }

    pub fn class_name(&self) -> &str {
        &self.schema.class(self.class).name
    }

    /// Whether this record is of `class` or one of its subclasses.
    pub fn is_a(&self, class: &str) -> bool {
        self.schema
            .class_by_name(class)
            .is_some_and(|class| self.schema.is_a(self.class, class.id))
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn is_in_db(&self) -> bool {
        self.id.is_some()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Result<Value> {
        if name == ID {
            return Ok(Value::from(self.id));
        }

        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_field(self.class_name(), name))
    }

    /// Reads `name` converted to `T`.
    pub fn get<T>(&self, name: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = Error>,
    {
        T::try_from(self.get_field(name)?)
            .map_err(|err| err.context(strata_core::err!("reading `{name}`")))
    }

    /// Assigns `value` to the column `name`, converting it to the column's
    /// type.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if name == ID {
            return Err(Error::invalid_statement(format!(
                "`ID` of `{}` is assigned by the database",
                self.class_name()
            )));
        }

        let value = match self.schema.database_fields(self.class).get(name) {
            Some(ty) => ty.coerce(value.into())?,
            None => return Err(Error::unknown_field(self.class_name(), name)),
        };

        self.mark(name, ChangeLevel::Type);

        if self.fields.get(name) != Some(&value) {
            self.mark(name, ChangeLevel::Value);
        }

        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    fn mark(&mut self, name: &str, level: ChangeLevel) {
        let current = self.changed.entry(name.to_string()).or_insert(level);
        *current = (*current).max(level);
    }

    /// Marks every column changed so the next write sends all of them.
    pub fn force_change(&mut self) {
        let schema = self.schema.clone();

        for name in schema.database_fields(self.class).keys() {
            if name != ID {
                self.mark(name, ChangeLevel::Value);
            }
        }
    }

    pub fn is_changed(&self, name: &str, level: ChangeLevel) -> bool {
        self.changed.get(name).is_some_and(|changed| *changed >= level)
    }

    pub fn changed_fields(&self, level: ChangeLevel) -> Vec<&str> {
        self.changed
            .iter()
            .filter(|(_, changed)| **changed >= level)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// The value `name` had when the record was last loaded or written.
    pub fn original(&self, name: &str) -> Option<&Value> {
        self.original.get(name)
    }

    /// Writes the record as version `version` instead of allocating a new
    /// one, leaving `LastEdited` untouched. Used when copying a version
    /// between stages.
    pub fn migrate_version(&mut self, version: u64) {
        self.migrating_version = Some(version);
    }

    pub fn migrating_version(&self) -> Option<u64> {
        self.migrating_version
    }

    pub(crate) fn clear_migrating_version(&mut self) {
        self.migrating_version = None;
    }

    /// Stores `value` as both current and original, without marking it
    /// changed.
    pub(crate) fn set_raw(&mut self, name: &str, value: Value) {
        self.original.insert(name.to_string(), value.clone());
        self.fields.insert(name.to_string(), value);
    }

    pub(crate) fn mark_clean(&mut self) {
        self.original = self.fields.clone();
        self.changed.clear();
    }

    pub fn downcast<M: Model>(self) -> Result<M> {
        M::from_record(self)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("class", &self.class_name())
            .field("id", &self.id)
            .field("stage", &self.stage)
            .field("fields", &self.fields)
            .field("changed", &self.changed)
            .finish()
    }
}
