use super::{root_table, versions_table, RECORD_ID, VERSION, WAS_PUBLISHED};
use crate::{Db, Record, Result, Stage};

use strata_core::Error;
use strata_sql::stmt::{Expr, Update};

/// Where [`publish`] reads the record from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishSource {
    /// The record as currently stored in a stage
    Stage(Stage),

    /// A snapshot from the record's version history
    Version(u64),
}

/// Copies `record` as stored in `from` into `to`.
///
/// The copy keeps the source's version number and `LastEdited` unless
/// `create_new_version` is set. Publishing to [`Stage::Live`] flags the
/// version as published. Fails with a not-found error when the record has
/// no row in the source stage or no such version.
pub fn publish(
    db: &mut Db,
    record: &Record,
    from: impl Into<PublishSource>,
    to: Stage,
    create_new_version: bool,
) -> Result<Record> {
    let id = record.require_id("publish")?;
    let class = record.class_name().to_string();
    let from = from.into();

    db.transaction(|db| {
        let mut source = match from {
            PublishSource::Stage(stage) => db.with_stage(stage, |db| db.get_by_id(&class, id))?,
            PublishSource::Version(version) => super::get_version(db, &class, id, version)?,
        };

        let version = source.get::<u64>(VERSION)?;
        if !create_new_version {
            source.migrate_version(version);
        }

        source.force_change();
        db.with_stage(to, |db| source.write(db))?;

        if to == Stage::Live {
            let versions = versions_table(root_table(record.schema(), record.class_id()));
            let published = source.get_field(VERSION)?;

            let update = Update::new(versions)
                .set(WAS_PUBLISHED, true)
                .filter(Expr::and(
                    Expr::eq(Expr::unqualified(RECORD_ID), id),
                    Expr::eq(Expr::unqualified(VERSION), published),
                ));

            db.execute(&update.into())?;
        }

        Ok(source)
    })
}

impl From<Stage> for PublishSource {
    fn from(value: Stage) -> Self {
        PublishSource::Stage(value)
    }
}

impl From<u64> for PublishSource {
    fn from(value: u64) -> Self {
        PublishSource::Version(value)
    }
}

/// Removes the record's rows from one stage, leaving the others and the
/// history untouched.
pub fn delete_from_stage(db: &mut Db, record: &Record, stage: Stage) -> Result<()> {
    let id = record.require_id("delete from stage")?;

    let deleted = db.with_stage(stage, |db| db.transaction(|db| record.delete_rows(db)))?;

    if deleted == 0 {
        return Err(Error::record_not_found(format!(
            "class={} id={id} stage={}",
            record.class_name(),
            stage.as_str()
        )));
    }

    Ok(())
}

pub fn unpublish(db: &mut Db, record: &Record) -> Result<()> {
    delete_from_stage(db, record, Stage::Live)
}

/// Writes the fields of `version` back to the draft stage as a new version
/// and reloads `record` from it.
pub fn rollback_to(db: &mut Db, record: &mut Record, version: u64) -> Result<()> {
    let id = record.require_id("roll back")?;
    let class = record.class_name().to_string();

    let mut old = super::get_version(db, &class, id, version)?;
    old.force_change();

    *record = db.with_stage(Stage::Draft, |db| {
        old.write(db)?;
        db.get_by_id(&class, id)
    })?;

    Ok(())
}
