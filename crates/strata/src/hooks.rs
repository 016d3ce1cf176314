use crate::{Db, Record, Result, ValidationResult};

use std::fmt::Debug;

/// Per-class callbacks around the record lifecycle.
///
/// Hooks registered on a class also run for every class extending it, root
/// class first.
pub trait Hooks: Debug + Send + Sync + 'static {
    /// Checked before anything is written. An invalid result aborts the
    /// write with [`Error::validation`](crate::Error::validation).
    fn validate(&self, record: &Record) -> ValidationResult {
        let _ = record;
        ValidationResult::valid()
    }

    /// Fills in values for a freshly created record.
    fn populate_defaults(&self, record: &mut Record) {
        let _ = record;
    }

    fn on_before_write(&self, db: &mut Db, record: &mut Record) -> Result<()> {
        let _ = (db, record);
        Ok(())
    }

    fn on_after_write(&self, db: &mut Db, record: &mut Record) -> Result<()> {
        let _ = (db, record);
        Ok(())
    }

    fn on_after_skipped_write(&self, db: &mut Db, record: &mut Record) -> Result<()> {
        let _ = (db, record);
        Ok(())
    }

    fn on_after_delete(&self, db: &mut Db, record: &mut Record) -> Result<()> {
        let _ = (db, record);
        Ok(())
    }
}
