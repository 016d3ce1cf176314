use super::Value;
use strata_core::schema::db::{self, Column};

/// A column as it appears inside `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: db::Type,
    pub not_null: bool,
    pub default: Option<Value>,

    /// Renders as `INTEGER PRIMARY KEY AUTOINCREMENT`
    pub auto_increment: bool,
}

impl ColumnDef {
    pub fn from_schema(column: &Column) -> ColumnDef {
        ColumnDef {
            name: column.name.clone(),
            ty: column.storage_ty,
            not_null: !column.nullable,
            default: column.default.clone(),
            auto_increment: column.auto_increment,
        }
    }
}
