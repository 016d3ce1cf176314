#[macro_use]
mod macros;

pub mod driver;
pub use driver::Connection;

mod error;
pub use error::Error;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

mod validation;
pub use validation::{ValidationMessage, ValidationResult};

/// A Result type alias that uses Strata's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
