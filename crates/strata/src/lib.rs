pub mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

pub mod db;
pub use db::Db;

pub mod extension;
pub use extension::{Cx, Extension, QueryInterceptor, WriteInterceptor};

mod hooks;
pub use hooks::Hooks;

pub mod model;
pub use model::Model;

pub mod record;
pub use record::{ChangeLevel, Record};

pub mod relation;
pub use relation::{RelationItem, RelationList};

mod base_query;

pub mod stage;
pub use stage::{Stage, StageContext, StageGuard};

pub mod versioned;
pub use versioned::{Versioned, VersionedState};

pub use strata_core::{
    bail, err, row,
    schema::{
        self,
        app::{ClassDef, ColumnType},
    },
    stmt::{Row, Value},
    Error, Result, Schema, ValidationMessage, ValidationResult,
};

pub use strata_sql::stmt::{Direction, Expr, SqlQuery};

pub use strata_sql as sql;
