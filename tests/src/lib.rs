mod exec_log;
pub use exec_log::ExecLog;


mod logging_driver;
pub use logging_driver::LoggingDriver;

mod setup;
pub use setup::{at, setup, setup_with_clock, TestDb};

pub use std_util::*;

pub mod prelude {
    pub use crate::{at, setup, setup_with_clock, ExecLog, TestDb};
    pub use std_util::prelude::*;
    pub use strata::{
        versioned, ChangeLevel, ClassDef, ColumnType, Db, Expr, Model, Record, Stage,
        StageContext, Value,
    };
}
