use crate::{ExecLog, LoggingDriver};

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use strata::{db::Builder, Db, ManualClock};
use strata_driver_sqlite::Sqlite;

/// A database on a fresh in-memory SQLite connection whose operations are
/// logged.
pub struct TestDb {
    pub db: Db,
    pub log: ExecLog,
}

/// Builds `builder` against in-memory SQLite, creates the schema and clears
/// the log of the schema statements.
pub fn setup(builder: &mut Builder) -> TestDb {
    let _ = env_logger::builder().is_test(true).try_init();

    let driver = LoggingDriver::new(Sqlite::in_memory());
    let mut log = ExecLog::new(driver.ops_log_handle());

    let mut db = builder.build(driver).unwrap();
    db.push_schema().unwrap();
    log.clear();

    TestDb { db, log }
}

/// Like [`setup`], with the clock pinned so timestamps are predictable.
pub fn setup_with_clock(builder: &mut Builder, now: NaiveDateTime) -> (TestDb, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    builder.clock(clock.clone());
    (setup(builder), clock)
}

/// `2024-05-01` at the given time.
pub fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|date| date.and_hms_opt(hour, min, sec))
        .unwrap()
}
