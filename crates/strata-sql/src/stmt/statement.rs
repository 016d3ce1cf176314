use super::*;

/// Any SQL statement the data layer issues.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    Delete(Delete),
    DropTable(DropTable),
    Insert(Insert),
    Query(SqlQuery),
    Update(Update),
}

impl Statement {
    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Query(_))
    }

    /// Whether executing the statement changes schema rather than rows.
    pub fn is_ddl(&self) -> bool {
        matches!(
            self,
            Statement::CreateIndex(_) | Statement::CreateTable(_) | Statement::DropTable(_)
        )
    }

    /// Name of the table the statement writes to, if any.
    pub fn target_table(&self) -> Option<&str> {
        match self {
            Statement::Delete(stmt) => Some(&stmt.table),
            Statement::Insert(stmt) => Some(&stmt.table),
            Statement::Update(stmt) => Some(&stmt.table),
            Statement::CreateTable(stmt) => Some(&stmt.name),
            Statement::CreateIndex(stmt) => Some(&stmt.table),
            Statement::DropTable(stmt) => Some(&stmt.name),
            Statement::Query(_) => None,
        }
    }

    /// Renders the statement as SQLite SQL.
    pub fn render(&self) -> String {
        crate::Serializer::sqlite().serialize(self)
    }
}
