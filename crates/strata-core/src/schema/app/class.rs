use super::{ColumnType, Relation};
use crate::{schema::db::TableId, stmt::Value};

use indexmap::IndexMap;
use std::fmt;

#[derive(Debug)]
pub struct Class {
    /// Uniquely identifies the class within the schema
    pub id: ClassId,

    /// Class name. Also the name of the class's own table and the value
    /// stored in the discriminator column.
    pub name: String,

    pub parent: Option<ClassId>,

    /// Table storing the columns declared at this level
    pub table: TableId,

    /// Root first, ending with this class.
    pub ancestry: Vec<ClassId>,

    /// Every class extending this one, directly or not, deepest first.
    pub descendants: Vec<ClassId>,

    /// Columns declared at this level, including `has_one` foreign keys.
    pub fields: IndexMap<String, ColumnType>,

    /// Columns of the whole ancestry plus the root's system columns.
    pub database_fields: IndexMap<String, ColumnType>,

    /// Values new records start with, inherited defaults included.
    pub defaults: IndexMap<String, Value>,

    /// Relations declared at this level.
    pub relations: IndexMap<String, Relation>,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct ClassId(pub usize);

impl Class {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn root_id(&self) -> ClassId {
        self.ancestry[0]
    }
}

impl From<&Class> for ClassId {
    fn from(value: &Class) -> Self {
        value.id
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ClassId({})", self.0)
    }
}
