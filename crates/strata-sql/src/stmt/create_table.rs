use super::{ColumnDef, SqlQuery, Statement};
use strata_core::schema::db::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,

    pub temporary: bool,

    pub columns: Vec<ColumnDef>,

    /// Emitted as a table constraint unless a column is auto-increment.
    pub primary_key: Vec<String>,

    /// `CREATE TABLE .. AS SELECT ..`, in which case `columns` is ignored
    pub as_query: Option<Box<SqlQuery>>,
}

impl Statement {
    pub fn create_table(table: &Table) -> Self {
        CreateTable {
            name: table.name.clone(),
            temporary: false,
            columns: table.columns.iter().map(ColumnDef::from_schema).collect(),
            primary_key: table.primary_key.clone(),
            as_query: None,
        }
        .into()
    }

    /// `CREATE TEMPORARY TABLE name AS query`
    pub fn create_temporary_table_as(name: impl Into<String>, query: SqlQuery) -> Self {
        CreateTable {
            name: name.into(),
            temporary: true,
            columns: vec![],
            primary_key: vec![],
            as_query: Some(Box::new(query)),
        }
        .into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Statement::CreateTable(value)
    }
}
