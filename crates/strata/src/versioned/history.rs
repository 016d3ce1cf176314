use super::{
    is_versioned_class, rewrite::versions_query, root_table, versions_table, VersionedState,
    AUTHOR_ID, RECORD_ID, VERSION, WAS_PUBLISHED,
};
use crate::{base_query, Db, Record, Result, Stage};

use strata_core::{schema::app::ColumnType, Error};
use strata_sql::stmt::{Direction, Expr, SqlQuery};

/// Records of `class` as stored in `stage`.
pub fn get_by_stage(
    db: &mut Db,
    class: &str,
    stage: Stage,
    filter: Option<Expr>,
) -> Result<Vec<Record>> {
    let mut query = db.base_query(class)?;

    if let Some(filter) = filter {
        query.filter(filter);
    }

    db.with_stage(stage, |db| db.fetch(class, query))
}

pub fn get_one_by_stage(
    db: &mut Db,
    class: &str,
    stage: Stage,
    filter: Option<Expr>,
) -> Result<Option<Record>> {
    let mut query = db.base_query(class)?;

    if let Some(filter) = filter {
        query.filter(filter);
    }
    query.limit(1);

    Ok(db
        .with_stage(stage, |db| db.fetch(class, query))?
        .into_iter()
        .next())
}

/// The history of record `id`, read from the `_versions` tables. Rows carry
/// `WasPublished` and `AuthorID` besides the class's own fields.
fn history_query(db: &Db, class: &str, id: u64) -> Result<SqlQuery> {
    let schema = db.schema();
    let class = schema.resolve_class(class)?;

    if !is_versioned_class(schema, class.id) {
        return Err(Error::invalid_schema(format!(
            "class `{}` is not versioned",
            class.name
        )));
    }

    let mut query = db.base_query(&class.name)?;
    query.filter(Expr::eq(base_query::id_column(schema, class.id), id));

    let mut query = versions_query(schema, query);
    let root = root_table(schema, class.id);
    query
        .select_column(root, WAS_PUBLISHED)
        .select_column(root, AUTHOR_ID);

    Ok(query)
}

/// Record `id` as it was written in `version`.
pub fn get_version(db: &mut Db, class: &str, id: u64, version: u64) -> Result<Record> {
    let mut query = history_query(db, class, id)?;
    let column = version_column(db, class)?;
    query.filter(Expr::eq(column, version));

    db.hydrate(class, &query)?.into_iter().next().ok_or_else(|| {
        Error::record_not_found(format!("class={class} id={id} version={version}"))
    })
}

pub fn get_latest_version(db: &mut Db, class: &str, id: u64) -> Result<Option<Record>> {
    let mut query = history_query(db, class, id)?;
    query
        .clear_order_by()
        .order_by(version_column(db, class)?, Direction::Desc)
        .limit(1);

    Ok(db.hydrate(class, &query)?.into_iter().next())
}

/// Every version of record `id`, oldest first.
pub fn all_versions(db: &mut Db, class: &str, id: u64) -> Result<Vec<Record>> {
    let mut query = history_query(db, class, id)?;
    query
        .clear_order_by()
        .order_by(version_column(db, class)?, Direction::Asc);

    db.hydrate(class, &query)
}

fn version_column(db: &Db, class: &str) -> Result<Expr> {
    let schema = db.schema();
    let class = schema.resolve_class(class)?;
    Ok(Expr::column(root_table(schema, class.id), VERSION))
}

/// Whether the record has a row in the live stage.
pub fn is_published(db: &mut Db, record: &Record) -> Result<bool> {
    Ok(find_in_stage(db, record, Stage::Live)?.is_some())
}

/// Whether the draft and live rows of the record hold different versions.
/// A record present in only one of the stages differs.
pub fn stages_differ(db: &mut Db, record: &Record) -> Result<bool> {
    let draft = find_in_stage(db, record, Stage::Draft)?;
    let live = find_in_stage(db, record, Stage::Live)?;

    match (draft, live) {
        (Some(draft), Some(live)) => Ok(draft.get_field(VERSION)? != live.get_field(VERSION)?),
        (None, None) => Ok(false),
        _ => Ok(true),
    }
}

fn find_in_stage(db: &mut Db, record: &Record, stage: Stage) -> Result<Option<Record>> {
    let Some(id) = record.id() else {
        return Ok(None);
    };

    let class = record.class_id();
    db.with_stage(stage, |db| db.find_class(class, id))
}

/// The stage `record` was read from or written to, its version and whether
/// that version was published.
pub fn state(db: &mut Db, record: &Record) -> Result<VersionedState> {
    let version = record.get_field(VERSION)?.to_id().unwrap_or(0);

    let was_published = match record.id() {
        Some(id) if version > 0 => {
            let versions = versions_table(root_table(record.schema(), record.class_id()));

            let mut query = SqlQuery::new();
            query
                .from(&versions)
                .select(Expr::column(&versions, WAS_PUBLISHED), None)
                .filter(Expr::eq(Expr::column(&versions, RECORD_ID), id))
                .filter(Expr::eq(Expr::column(&versions, VERSION), version));

            let value = db.cx().query_value(&query)?;
            bool::try_from(ColumnType::Boolean.coerce(value)?)?
        }
        _ => false,
    };

    Ok(VersionedState {
        stage: record.stage(),
        version,
        was_published,
    })
}
