pub mod app;
use app::{Class, ClassId, ColumnType, Relation};

mod builder;
pub use builder::Builder;

pub mod db;
use db::{Table, TableId, TableKind};

mod verify;

use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Surrogate primary key shared by every table level of a record.
pub const ID: &str = "ID";

/// Discriminator column holding the concrete class name of each row.
pub const CLASS_NAME: &str = "ClassName";

pub const CREATED: &str = "Created";

pub const LAST_EDITED: &str = "LastEdited";

/// Columns every root table carries that classes may not declare.
pub const RESERVED_FIELDS: [&str; 4] = [ID, CLASS_NAME, CREATED, LAST_EDITED];

/// The class/table map: which classes exist, how they inherit from each
/// other, which table level owns which column and how relations resolve.
///
/// Built once by [`Builder`] and read-only afterwards.
#[derive(Debug)]
pub struct Schema {
    /// Classes in registration order, indexed by [`ClassId`].
    pub classes: Vec<Class>,

    /// One table per class followed by one table per many-many relation,
    /// indexed by [`TableId`].
    pub tables: Vec<Table>,

    class_lookup: HashMap<String, ClassId>,
    table_lookup: HashMap<String, TableId>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn class(&self, id: impl Into<ClassId>) -> &Class {
        &self.classes[id.into().0]
    }

    pub fn class_by_name(&self, name: &str) -> Option<&Class> {
        self.class_lookup.get(name).map(|id| self.class(*id))
    }

    /// Like [`class_by_name`](Self::class_by_name), failing for names that
    /// were never registered.
    pub fn resolve_class(&self, name: &str) -> Result<&Class> {
        self.class_by_name(name)
            .ok_or_else(|| Error::invalid_schema(format!("unknown class `{name}`")))
    }

    /// The class owning the auto-increment key for `id`'s hierarchy.
    pub fn root(&self, id: impl Into<ClassId>) -> &Class {
        let class = self.class(id);
        self.class(class.ancestry[0])
    }

    /// Every class from the root down to (and including) `id`.
    pub fn ancestry(&self, id: impl Into<ClassId>) -> impl Iterator<Item = &Class> + '_ {
        self.class(id)
            .ancestry
            .iter()
            .map(move |class| self.class(*class))
    }

    /// Tables of the ancestry, root table first.
    pub fn ancestry_tables(&self, id: impl Into<ClassId>) -> impl Iterator<Item = &Table> + '_ {
        self.ancestry(id).map(move |class| self.table(class.table))
    }

    /// `id` itself followed by all of its descendants.
    pub fn subclasses(&self, id: impl Into<ClassId>) -> impl Iterator<Item = &Class> + '_ {
        let class = self.class(id);
        std::iter::once(class).chain(class.descendants.iter().map(move |id| self.class(*id)))
    }

    /// Every class sharing `id`'s root, root first.
    pub fn hierarchy(&self, id: impl Into<ClassId>) -> impl Iterator<Item = &Class> + '_ {
        let root = self.root(id).id;
        self.subclasses(root)
    }

    pub fn is_a(&self, class: impl Into<ClassId>, ancestor: impl Into<ClassId>) -> bool {
        self.class(class).ancestry.contains(&ancestor.into())
    }

    /// Columns a record of `id` carries, root columns first.
    pub fn database_fields(&self, id: impl Into<ClassId>) -> &IndexMap<String, ColumnType> {
        &self.class(id).database_fields
    }

    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        &self.tables[id.into().0]
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.table_lookup.get(name).map(|id| self.table(*id))
    }

    /// The class whose table is `name`, if `name` is a class table.
    pub fn class_for_table(&self, name: &str) -> Option<&Class> {
        match self.table_by_name(name)?.kind {
            TableKind::Class(class) => Some(self.class(class)),
            _ => None,
        }
    }

    /// The deepest table in `class`'s ancestry that stores `field`.
    pub fn table_for_field(&self, class: impl Into<ClassId>, field: &str) -> Option<&Table> {
        let class = self.class(class);

        if field == ID {
            return Some(self.table(self.root(class.id).table));
        }

        class
            .ancestry
            .iter()
            .rev()
            .map(|class| self.table(self.class(*class).table))
            .find(|table| table.column(field).is_some())
    }

    /// Finds relation `name` declared on `class` or any of its ancestors.
    pub fn relation(&self, class: impl Into<ClassId>, name: &str) -> Result<&Relation> {
        let class = self.class(class);

        class
            .ancestry
            .iter()
            .rev()
            .find_map(|id| self.class(*id).relations.get(name))
            .ok_or_else(|| {
                Error::invalid_schema(format!(
                    "class `{}` has no relation named `{name}`",
                    class.name
                ))
            })
    }

    /// All relations visible from `class`, ancestors' first.
    pub fn relations(&self, class: impl Into<ClassId>) -> impl Iterator<Item = &Relation> + '_ {
        self.ancestry(class)
            .flat_map(|class| class.relations.values())
    }

    /// Whether any class table stores a column called `name`.
    pub fn is_known_column(&self, name: &str) -> bool {
        self.tables
            .iter()
            .filter(|table| matches!(table.kind, TableKind::Class(_)))
            .any(|table| table.column(name).is_some())
    }
}
