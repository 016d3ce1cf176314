use super::Statement;
use strata_core::schema::db::{Index, Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Statement {
    pub fn create_index(table: &Table, index: &Index) -> Self {
        CreateIndex {
            name: index.name.clone(),
            table: table.name.clone(),
            columns: index.columns.clone(),
            unique: index.unique,
        }
        .into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Statement::CreateIndex(value)
    }
}
