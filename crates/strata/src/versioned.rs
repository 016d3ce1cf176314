//! Draft/live staging and version history for whole class hierarchies.
//!
//! Registering [`Versioned`] as an extension gives each listed root class a
//! `Version` column and two extra tables per table level: `{T}_Live` holds
//! published rows and `{T}_versions` holds one snapshot per write. Reads and
//! writes are redirected according to the [`StageContext`](crate::StageContext)
//! of the [`Db`](crate::Db) they go through.

mod history;
pub use history::{
    all_versions, get_by_stage, get_latest_version, get_one_by_stage, get_version, is_published,
    stages_differ, state,
};

mod publish;
pub use publish::{delete_from_stage, publish, rollback_to, unpublish, PublishSource};

mod rewrite;

mod tables;

mod write;

use crate::{
    extension::{Cx, Extension, QueryInterceptor, WriteInterceptor},
    Record, Result, Stage,
};

use strata_core::{
    schema::{
        app::{Class, ClassDef, ClassId, ColumnType, ExtraStatics},
        db::Table,
    },
    Schema,
};
use strata_sql::stmt::{Manipulation, SqlQuery};

/// Version number of a row, per record id.
pub const VERSION: &str = "Version";

/// Id of the record a `_versions` row snapshots.
pub const RECORD_ID: &str = "RecordID";

pub const WAS_PUBLISHED: &str = "WasPublished";

pub const AUTHOR_ID: &str = "AuthorID";

/// The staging extension. Lists the root classes whose hierarchies are
/// versioned.
#[derive(Debug, Clone, Default)]
pub struct Versioned {
    roots: Vec<String>,
}

/// Where a record stands in its version history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionedState {
    pub stage: Stage,

    /// Zero for records never written
    pub version: u64,

    /// Whether `version` was ever published to the live stage
    pub was_published: bool,
}

impl Versioned {
    pub fn new<I>(roots: I) -> Versioned
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Versioned {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }
}

/// Whether records of `class` go through the staging tables.
pub fn is_versioned_class(schema: &Schema, class: impl Into<ClassId>) -> bool {
    schema.root(class).database_fields.contains_key(VERSION)
}

/// The versioned class whose base table is `table`.
pub fn versioned_class<'a>(schema: &'a Schema, table: &str) -> Option<&'a Class> {
    schema
        .class_for_table(table)
        .filter(|class| is_versioned_class(schema, class.id))
}

/// Name of the base table at the root of `class`'s hierarchy.
fn root_table(schema: &Schema, class: ClassId) -> &str {
    &schema.table(schema.root(class).table).name
}

fn versions_table(table: &str) -> String {
    format!("{table}_versions")
}

impl Extension for Versioned {
    fn extra_statics(&self, class: &ClassDef) -> ExtraStatics {
        if class.is_root() && self.roots.contains(&class.name) {
            ExtraStatics::default().field(VERSION, ColumnType::Int)
        } else {
            ExtraStatics::default()
        }
    }

    fn augment_database(&self, schema: &Schema, table: &Table) -> Vec<Table> {
        let Some(class) = table.class() else {
            return vec![];
        };

        if !is_versioned_class(schema, class) {
            return vec![];
        }

        vec![
            tables::live(table),
            tables::versions(table, schema.class(class).is_root()),
        ]
    }
}

impl QueryInterceptor for Versioned {
    fn augment_sql(&self, cx: &mut Cx<'_>, query: SqlQuery) -> Result<SqlQuery> {
        rewrite::augment_sql(cx, query)
    }
}

impl WriteInterceptor for Versioned {
    fn augment_write(
        &self,
        cx: &mut Cx<'_>,
        record: &Record,
        manipulation: Manipulation,
    ) -> Result<Manipulation> {
        write::augment_write(cx, record, manipulation)
    }

    fn on_after_write(
        &self,
        _cx: &mut Cx<'_>,
        record: &mut Record,
        manipulation: &Manipulation,
    ) -> Result<()> {
        write::sync_version(record, manipulation);
        Ok(())
    }
}
