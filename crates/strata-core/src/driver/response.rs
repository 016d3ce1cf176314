use crate::{stmt::Row, Error, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, one map per row in column order
    Values(Vec<Row>),

    /// Id generated by the most recent insert
    LastInsertId(u64),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(rows: Vec<Row>) -> Self {
        Self {
            rows: Rows::Values(rows),
        }
    }

    pub fn last_insert_id(id: u64) -> Self {
        Self {
            rows: Rows::LastInsertId(id),
        }
    }

    pub fn empty() -> Self {
        Self::count(0)
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            _ => Err(Error::invalid_result(format!("expected Count, got {}", self.name()))),
        }
    }

    pub fn into_values(self) -> Result<Vec<Row>> {
        match self {
            Rows::Values(values) => Ok(values),
            _ => Err(Error::invalid_result(format!("expected Values, got {}", self.name()))),
        }
    }

    pub fn into_last_insert_id(self) -> Result<u64> {
        match self {
            Rows::LastInsertId(id) => Ok(id),
            _ => Err(Error::invalid_result(format!(
                "expected LastInsertId, got {}",
                self.name()
            ))),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Rows::Count(_) => "Count",
            Rows::Values(_) => "Values",
            Rows::LastInsertId(_) => "LastInsertId",
        }
    }
}
