use super::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySql {
    /// The SQL query to execute
    pub sql: String,
}

impl QuerySql {
    pub fn new(sql: impl Into<String>) -> QuerySql {
        QuerySql { sql: sql.into() }
    }
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}
