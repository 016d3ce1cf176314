use super::{Column, Index};
use crate::schema::app::ClassId;

use std::fmt;

/// A database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    pub kind: TableKind,

    /// The table's columns
    pub columns: Vec<Column>,

    /// Names of the primary key columns
    pub primary_key: Vec<String>,

    pub indices: Vec<Index>,
}

/// What a table stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// The columns one class level declares
    Class(ClassId),

    /// Rows linking records of a many-many relation
    Join { owner: ClassId },

    /// A copy of another table contributed by an extension (stage and
    /// history tables). Shadow tables are not registered in the schema and
    /// share the id of the table they copy.
    Shadow(TableId),
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TableId(pub usize);

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn class(&self) -> Option<ClassId> {
        match self.kind {
            TableKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn is_shadow(&self) -> bool {
        matches!(self.kind, TableKind::Shadow(_))
    }

    /// Starts a shadow copy of this table named `name` with no columns;
    /// callers add the columns the copy should carry.
    pub fn shadow(&self, name: impl Into<String>) -> Table {
        Table {
            id: self.id,
            name: name.into(),
            kind: TableKind::Shadow(self.id),
            columns: vec![],
            primary_key: vec![],
            indices: vec![],
        }
    }

    /// Adds an index over `columns` named after the table and columns.
    pub fn push_index(&mut self, columns: Vec<String>, unique: bool) {
        let name = format!("{}_{}", self.name, columns.join("_"));
        if self.indices.iter().any(|index| index.name == name) {
            return;
        }
        self.indices.push(Index {
            name,
            columns,
            unique,
        });
    }
}

impl From<&Table> for TableId {
    fn from(value: &Table) -> Self {
        value.id
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
