use super::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecSql {
    /// The SQL statement to execute
    pub sql: String,
}

impl ExecSql {
    pub fn new(sql: impl Into<String>) -> ExecSql {
        ExecSql { sql: sql.into() }
    }
}

impl From<ExecSql> for Operation {
    fn from(value: ExecSql) -> Self {
        Self::ExecSql(value)
    }
}
