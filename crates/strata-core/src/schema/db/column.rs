use super::Type;
use crate::{schema::app::ColumnType, stmt::Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database.
    pub name: String,

    /// The column type as classes declare it.
    pub ty: ColumnType,

    /// The database storage type of the column.
    pub storage_ty: Type,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// True if the column is part of the table's primary key
    pub primary_key: bool,

    /// True if the column is an integer assigned by the database on insert
    pub auto_increment: bool,

    /// Value used when an insert does not name the column
    pub default: Option<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Column {
        Column {
            name: name.into(),
            storage_ty: ty.storage_ty(),
            nullable: ty.nullable(),
            default: ty.column_default(),
            ty,
            primary_key: false,
            auto_increment: false,
        }
    }

    /// The auto-increment `ID` column of a root table.
    pub fn auto_increment_id(name: impl Into<String>) -> Column {
        Column {
            primary_key: true,
            auto_increment: true,
            nullable: false,
            default: None,
            ..Column::new(name, ColumnType::Int)
        }
    }

    /// An `ID` column whose value is copied from the root table.
    pub fn shared_id(name: impl Into<String>) -> Column {
        Column {
            primary_key: true,
            nullable: false,
            default: None,
            ..Column::new(name, ColumnType::Int)
        }
    }
}
