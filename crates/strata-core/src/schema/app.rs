//! Application-level schema

mod class;
pub use class::{Class, ClassId};

mod class_def;
pub use class_def::{ClassDef, ExtraStatics, IndexDef, RelationDef};

mod column_type;
pub use column_type::ColumnType;

mod relation;
pub use relation::{BelongsTo, HasMany, HasOne, ManyMany, Relation};
