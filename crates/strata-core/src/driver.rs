mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::Result;

use std::fmt::Debug;

/// A database backend that hands out connections.
pub trait Driver: Debug + Send + Sync + 'static {
    /// The URL the driver was configured with.
    fn url(&self) -> String;

    /// Opens a new connection.
    fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// A single blocking session with the database.
///
/// Operations run in the order they are submitted. Transaction operations
/// open, commit and roll back scopes on this connection only.
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    fn exec(&mut self, op: Operation) -> Result<Response>;
}
