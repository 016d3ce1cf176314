mod num;

mod value;
pub use value::Value;

mod value_chrono;
pub use value_chrono::TIMESTAMP_FORMAT;

use indexmap::IndexMap;

/// A single result row or field set, keyed by column name in select order.
pub type Row = IndexMap<String, Value>;
