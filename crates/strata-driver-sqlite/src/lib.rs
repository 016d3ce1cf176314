mod value;

use rusqlite::Connection as RusqliteConnection;
use std::path::{Path, PathBuf};
use strata_core::{
    driver::{
        operation::Operation,
        Driver, Response,
    },
    stmt::Row,
    Error, Result,
};
use strata_sql as sql;
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_statement(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

impl Driver for Sqlite {
    fn url(&self) -> String {
        match self {
            Sqlite::InMemory => "sqlite::memory:".to_string(),
            Sqlite::File(path) => format!("sqlite:{}", path.display()),
        }
    }

    fn connect(&self) -> Result<Box<dyn strata_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    /// Every in-memory connection is its own database.
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver)?;
        Ok(Self { connection })
    }

    fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let mut stmt = self.connection.prepare_cached(sql).map_err(Error::driver)?;

        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = stmt.query([]).map_err(Error::driver)?;
        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let mut values = Row::with_capacity(columns.len());

            for (index, column) in columns.iter().enumerate() {
                let value = row.get_ref(index).map_err(Error::driver)?;
                values.insert(column.clone(), value::from_sql(value));
            }

            ret.push(values);
        }

        Ok(ret)
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        let count = self.connection.execute(sql, []).map_err(Error::driver)?;
        Ok(count as u64)
    }
}

impl strata_core::driver::Connection for Connection {
    fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::QuerySql(op) => {
                tracing::trace!(sql = %op.sql, "sqlite query");
                Ok(Response::values(self.query(&op.sql)?))
            }
            Operation::ExecSql(op) => {
                tracing::trace!(sql = %op.sql, "sqlite exec");
                Ok(Response::count(self.execute(&op.sql)?))
            }
            Operation::LastInsertId => {
                let id = self.connection.last_insert_rowid();
                let id = u64::try_from(id).map_err(|_| {
                    Error::invalid_result(format!("negative last insert id {id}"))
                })?;
                Ok(Response::last_insert_id(id))
            }
            Operation::Transaction(op) => {
                let sql = sql::Serializer::sqlite().serialize_transaction(&op);
                tracing::trace!(%sql, "sqlite transaction");
                self.connection
                    .execute_batch(&sql)
                    .map_err(Error::driver)?;
                Ok(Response::empty())
            }
        }
    }
}
