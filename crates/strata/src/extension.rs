//! Cross-cutting overlays that rewrite queries and writes.
//!
//! Extensions are invoked in registration order. Each one receives the query
//! or [`Manipulation`] produced by the previous one and returns the value the
//! next one sees.

use crate::{Clock, Record, Result, Stage, StageContext};

use chrono::NaiveDateTime;
use std::{collections::HashMap, fmt::Debug, sync::Arc};
use strata_core::{
    driver::operation::{ExecSql, QuerySql, Transaction},
    schema::{
        app::{ClassDef, ExtraStatics},
        db::Table,
    },
    stmt::{Row, Value},
    Connection, Schema,
};
use strata_sql::stmt::{Manipulation, SqlQuery, Statement};

/// What an interceptor may do with the database while rewriting.
pub struct Cx<'a> {
    pub(crate) schema: &'a Arc<Schema>,
    pub(crate) connection: &'a mut dyn Connection,
    pub(crate) context: StageContext,
    /// Memoized keys and the transaction depth each was recorded at
    pub(crate) memo: &'a mut HashMap<String, usize>,
    pub(crate) depth: usize,
    pub(crate) clock: &'a dyn Clock,
    pub(crate) author: Option<u64>,
}

pub trait QueryInterceptor {
    /// Rewrites a query before it is sent to the database.
    fn augment_sql(&self, cx: &mut Cx<'_>, query: SqlQuery) -> Result<SqlQuery> {
        let _ = cx;
        Ok(query)
    }
}

pub trait WriteInterceptor {
    fn on_before_write(&self, cx: &mut Cx<'_>, record: &mut Record) -> Result<()> {
        let _ = (cx, record);
        Ok(())
    }

    /// Rewrites the per-table operations of one record write or delete.
    fn augment_write(
        &self,
        cx: &mut Cx<'_>,
        record: &Record,
        manipulation: Manipulation,
    ) -> Result<Manipulation> {
        let _ = (cx, record);
        Ok(manipulation)
    }

    fn on_after_write(
        &self,
        cx: &mut Cx<'_>,
        record: &mut Record,
        manipulation: &Manipulation,
    ) -> Result<()> {
        let _ = (cx, record, manipulation);
        Ok(())
    }

    /// Called instead of `on_after_write` when a write had nothing to do.
    fn on_after_skipped_write(&self, cx: &mut Cx<'_>, record: &mut Record) -> Result<()> {
        let _ = (cx, record);
        Ok(())
    }

    fn on_after_delete(&self, cx: &mut Cx<'_>, record: &mut Record) -> Result<()> {
        let _ = (cx, record);
        Ok(())
    }
}

/// An overlay registered with [`db::Builder::extension`](crate::db::Builder::extension).
pub trait Extension: QueryInterceptor + WriteInterceptor + Debug + Send + Sync + 'static {
    /// Fields, `has_one` relations, defaults and indices to add to `class`
    /// before the schema is resolved.
    fn extra_statics(&self, class: &ClassDef) -> ExtraStatics {
        let _ = class;
        ExtraStatics::default()
    }

    /// Additional tables to create alongside `table`.
    fn augment_database(&self, schema: &Schema, table: &Table) -> Vec<Table> {
        let _ = (schema, table);
        vec![]
    }
}

impl<'a> Cx<'a> {
    pub fn schema(&self) -> &'a Arc<Schema> {
        self.schema
    }

    pub fn context(&self) -> StageContext {
        self.context
    }

    pub fn stage(&self) -> Stage {
        self.context.stage
    }

    pub fn archived(&self) -> Option<NaiveDateTime> {
        self.context.archived
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// The member credited with writes made through this handle.
    pub fn author(&self) -> Option<u64> {
        self.author
    }

    /// Records `key` for the lifetime of the connection. Returns `true` the
    /// first time a key is seen.
    ///
    /// Keys recorded inside a transaction scope are forgotten when that scope
    /// rolls back.
    pub fn memoize(&mut self, key: impl Into<String>) -> bool {
        let depth = self.depth;
        let mut inserted = false;

        self.memo.entry(key.into()).or_insert_with(|| {
            inserted = true;
            depth
        });

        inserted
    }

    /// Executes `stmt`, returning the number of rows it affected (or
    /// returned, for queries).
    pub fn exec(&mut self, stmt: &Statement) -> Result<u64> {
        let sql = stmt.render();
        tracing::debug!(%sql, "exec");

        if stmt.is_query() {
            let rows = self
                .connection
                .exec(QuerySql::new(sql).into())?
                .rows
                .into_values()?;
            Ok(rows.len() as u64)
        } else {
            self.connection.exec(ExecSql::new(sql).into())?.rows.into_count()
        }
    }

    /// Runs `query` as is. Interceptors are not consulted.
    pub fn query(&mut self, query: &SqlQuery) -> Result<Vec<Row>> {
        let sql = query.render();
        tracing::debug!(%sql, "query");

        self.connection
            .exec(QuerySql::new(sql).into())?
            .rows
            .into_values()
    }

    /// First column of the first row, `Null` when nothing matched.
    pub fn query_value(&mut self, query: &SqlQuery) -> Result<Value> {
        let rows = self.query(query)?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .map(|(_, value)| value)
            .unwrap_or_default())
    }

    pub fn last_insert_id(&mut self) -> Result<u64> {
        self.connection
            .exec(strata_core::driver::Operation::LastInsertId)?
            .rows
            .into_last_insert_id()
    }

    pub(crate) fn transaction(&mut self, op: Transaction) -> Result<()> {
        self.connection.exec(op.into())?;

        let depth = self.depth;

        match op {
            // Only what was created inside the rolled back scope is gone.
            Transaction::Rollback | Transaction::RollbackToSavepoint(_) => {
                self.memo.retain(|_, recorded| *recorded <= depth);
            }
            // Keys of a committed scope now belong to the enclosing one.
            Transaction::Commit | Transaction::ReleaseSavepoint(_) => {
                for recorded in self.memo.values_mut() {
                    *recorded = (*recorded).min(depth);
                }
            }
            _ => {}
        }

        Ok(())
    }
}
