use super::Statement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTable {
    pub name: String,
    pub if_exists: bool,
}

impl Statement {
    pub fn drop_table(name: impl Into<String>) -> Self {
        DropTable {
            name: name.into(),
            if_exists: true,
        }
        .into()
    }
}

impl From<DropTable> for Statement {
    fn from(value: DropTable) -> Self {
        Statement::DropTable(value)
    }
}
