mod builder;
pub use builder::Builder;

mod connect;
pub use connect::Connect;

mod transaction;

use crate::{
    base_query, extension::Cx, Clock, Extension, Hooks, Model, Record, Result, StageContext,
};

use chrono::NaiveDateTime;
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use strata_core::{
    schema::app::ClassId,
    stmt::Row,
    Connection, Error, Schema,
};
use strata_sql::stmt::{Expr, SqlQuery, Statement};

/// State shared by every handle built from the same [`Builder`].
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) schema: Arc<Schema>,

    /// Invoked in registration order
    pub(crate) extensions: Vec<Arc<dyn Extension>>,

    /// Hooks keyed by the class they were registered on
    pub(crate) hooks: HashMap<ClassId, Vec<Arc<dyn Hooks>>>,

    pub(crate) clock: Arc<dyn Clock>,

    /// Base queries are the expensive part of the mapper; built once per
    /// class and cloned on use.
    base_queries: RwLock<HashMap<(ClassId, bool), SqlQuery>>,
}

/// A database handle owning one connection.
#[derive(Debug)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
    connection: Box<dyn Connection>,
    pub(crate) context: StageContext,

    /// Keys memoized by interceptors, with the depth they were recorded at
    memo: HashMap<String, usize>,

    /// Number of open transaction scopes
    depth: usize,

    author: Option<u64>,
}

impl Shared {
    /// Hooks applying to `class`, those registered on the root first.
    pub(crate) fn hooks_for(&self, class: ClassId) -> Vec<Arc<dyn Hooks>> {
        self.schema
            .class(class)
            .ancestry
            .iter()
            .filter_map(|class| self.hooks.get(class))
            .flatten()
            .cloned()
            .collect()
    }

    pub(crate) fn base_query(&self, class: ClassId, restrict: bool) -> SqlQuery {
        let key = (class, restrict);

        if let Some(query) = self
            .base_queries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return query.clone();
        }

        let query = base_query::build(&self.schema, class, restrict);

        self.base_queries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(query)
            .clone()
    }
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    pub fn now(&self) -> NaiveDateTime {
        self.shared.clock.now()
    }

    pub fn author(&self) -> Option<u64> {
        self.author
    }

    /// Credits subsequent writes to `author`.
    pub fn set_author(&mut self, author: Option<u64>) {
        self.author = author;
    }

    pub(crate) fn cx(&mut self) -> Cx<'_> {
        Cx {
            schema: &self.shared.schema,
            connection: &mut *self.connection,
            context: self.context,
            memo: &mut self.memo,
            depth: self.depth,
            clock: &*self.shared.clock,
            author: self.author,
        }
    }

    /// Executes a statement as is, returning the affected row count.
    pub fn execute(&mut self, stmt: &Statement) -> Result<u64> {
        self.cx().exec(stmt)
    }

    /// Runs `query` after every extension has had a chance to rewrite it.
    pub fn query(&mut self, query: SqlQuery) -> Result<Vec<Row>> {
        let query = self.augment(query)?;
        self.cx().query(&query)
    }

    pub(crate) fn augment(&mut self, mut query: SqlQuery) -> Result<SqlQuery> {
        let shared = self.shared.clone();
        let mut cx = self.cx();

        for extension in &shared.extensions {
            query = extension.augment_sql(&mut cx, query)?;
        }

        Ok(query)
    }

    /// The query selecting every record of `class` and its subclasses,
    /// with all of their columns.
    pub fn base_query(&self, class: &str) -> Result<SqlQuery> {
        self.base_query_with(class, true)
    }

    /// Like [`base_query`](Self::base_query). When `restrict` is `false`
    /// the discriminator filter is left out.
    pub fn base_query_with(&self, class: &str, restrict: bool) -> Result<SqlQuery> {
        let class = self.shared.schema.resolve_class(class)?.id;
        Ok(self.shared.base_query(class, restrict))
    }

    /// The expression naming `field` of `class` in its base query.
    pub fn column(&self, class: &str, field: &str) -> Result<Expr> {
        let schema = &self.shared.schema;
        let class = schema.resolve_class(class)?;
        base_query::field_column(schema, class.id, field)
    }

    /// Runs `query` through the extensions and hydrates each row.
    pub fn fetch(&mut self, class: &str, query: SqlQuery) -> Result<Vec<Record>> {
        let class = self.shared.schema.resolve_class(class)?.id;
        self.fetch_class(class, query)
    }

    pub(crate) fn fetch_class(&mut self, class: ClassId, query: SqlQuery) -> Result<Vec<Record>> {
        let query = self.augment(query)?;
        self.hydrate_class(class, &query)
    }

    /// Hydrates the rows of `query` without consulting the extensions.
    pub fn hydrate(&mut self, class: &str, query: &SqlQuery) -> Result<Vec<Record>> {
        let class = self.shared.schema.resolve_class(class)?.id;
        self.hydrate_class(class, query)
    }

    pub(crate) fn hydrate_class(&mut self, class: ClassId, query: &SqlQuery) -> Result<Vec<Record>> {
        let stage = self.context.stage;
        let rows = self.cx().query(query)?;

        rows.into_iter()
            .map(|row| Record::hydrate(&self.shared.schema, class, row, stage))
            .collect()
    }

    pub fn all(&mut self, class: &str) -> Result<Vec<Record>> {
        let query = self.base_query(class)?;
        self.fetch(class, query)
    }

    pub fn filter(&mut self, class: &str, filter: impl Into<Expr>) -> Result<Vec<Record>> {
        let mut query = self.base_query(class)?;
        query.filter(filter);
        self.fetch(class, query)
    }

    pub fn first(&mut self, class: &str, filter: impl Into<Expr>) -> Result<Option<Record>> {
        let mut query = self.base_query(class)?;
        query.filter(filter).limit(1);
        Ok(self.fetch(class, query)?.into_iter().next())
    }

    pub fn get_by_id(&mut self, class: &str, id: u64) -> Result<Record> {
        let class = self.shared.schema.resolve_class(class)?.id;
        self.get_class(class, id)
    }

    pub(crate) fn find_class(&mut self, class: ClassId, id: u64) -> Result<Option<Record>> {
        let mut query = self.shared.base_query(class, true);
        query
            .filter(Expr::eq(base_query::id_column(&self.shared.schema, class), id))
            .limit(1);
        Ok(self.fetch_class(class, query)?.into_iter().next())
    }

    pub(crate) fn get_class(&mut self, class: ClassId, id: u64) -> Result<Record> {
        self.find_class(class, id)?.ok_or_else(|| {
            Error::record_not_found(format!(
                "class={} id={id}",
                self.shared.schema.class(class).name
            ))
        })
    }

    /// Counts what `query` would return without its limit.
    pub fn unlimited_row_count(&mut self, query: &SqlQuery, column: Expr) -> Result<u64> {
        let query = self.augment(query.to_count_query(column))?;
        let count = self.cx().query_value(&query)?;
        Ok(u64::try_from(count)?)
    }

    /// A new, unsaved record of `class` with its defaults applied.
    pub fn create(&self, class: &str) -> Result<Record> {
        let class = self.shared.schema.resolve_class(class)?.id;
        let mut record = Record::new(self.shared.schema.clone(), class);
        record.apply_defaults()?;

        for hooks in self.shared.hooks_for(class) {
            hooks.populate_defaults(&mut record);
        }

        Ok(record)
    }

    pub fn get<M: Model>(&mut self, id: u64) -> Result<M> {
        M::from_record(self.get_by_id(M::CLASS, id)?)
    }

    pub fn create_model<M: Model>(&self) -> Result<M> {
        M::from_record(self.create(M::CLASS)?)
    }

    /// Creates every table and index of the schema, plus the tables
    /// extensions add, in one transaction.
    pub fn push_schema(&mut self) -> Result<()> {
        let shared = self.shared.clone();
        let schema = &shared.schema;

        let mut tables = vec![];

        for table in &schema.tables {
            tables.push(table.clone());

            for extension in &shared.extensions {
                tables.extend(extension.augment_database(schema, table));
            }
        }

        tracing::info!(tables = tables.len(), "pushing schema");

        self.transaction(|db| {
            for table in &tables {
                db.execute(&Statement::create_table(table))?;

                for index in &table.indices {
                    db.execute(&Statement::create_index(table, index))?;
                }
            }

            Ok(())
        })
    }
}

