use crate::{base_query, Db, Record, Result};

use std::{collections::HashSet, sync::Arc};
use strata_core::{
    schema::app::{ClassId, HasMany, ManyMany, Relation},
    stmt::{Row, Value},
    Error, Schema,
};
use strata_sql::stmt::{Delete, Expr, Insert, SqlQuery};

/// The records on the other side of a `has_many` or many-many relation,
/// scoped to one owner.
///
/// Items are loaded on first access and cached until the list is changed
/// through it.
#[derive(Debug, Clone)]
pub struct RelationList {
    schema: Arc<Schema>,
    owner_id: u64,
    kind: Kind,
    items: Option<Vec<Record>>,
}

#[derive(Debug, Clone)]
enum Kind {
    HasMany(HasMany),
    ManyMany(ManyMany),
}

/// Something that can be added to or removed from a [`RelationList`].
#[derive(Debug)]
pub enum RelationItem<'a> {
    Record(&'a mut Record),
    Id(u64),
}

impl RelationList {
    pub(crate) fn new(schema: Arc<Schema>, owner_id: u64, relation: Relation) -> Result<Self> {
        let kind = match relation {
            Relation::HasMany(rel) => Kind::HasMany(rel),
            Relation::ManyMany(rel) => Kind::ManyMany(rel),
            other => {
                return Err(Error::invalid_schema(format!(
                    "relation `{}` is not a list",
                    other.name()
                )))
            }
        };

        Ok(RelationList {
            schema,
            owner_id,
            kind,
            items: None,
        })
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    fn target(&self) -> ClassId {
        match &self.kind {
            Kind::HasMany(rel) => rel.target,
            Kind::ManyMany(rel) => rel.target,
        }
    }

    /// The query selecting the list's items. Many-many items carry the join
    /// row's extra columns.
    pub fn query(&self, db: &Db) -> Result<SqlQuery> {
        let target = self.target();
        let mut query = db.shared.base_query(target, true);

        match &self.kind {
            Kind::HasMany(rel) => {
                let column = base_query::field_column(&self.schema, target, &rel.join_column)?;
                query.filter(Expr::eq(column, self.owner_id));
            }
            Kind::ManyMany(rel) => {
                let join = &rel.join_table;

                query.inner_join_as(
                    join,
                    join,
                    Expr::eq(
                        Expr::column(join, &rel.foreign_key),
                        base_query::id_column(&self.schema, target),
                    ),
                );
                query.filter(Expr::eq(Expr::column(join, &rel.local_key), self.owner_id));

                for extra in rel.extra_fields.keys() {
                    query.select_column(join, extra);
                }
            }
        }

        Ok(query)
    }

    pub fn items(&mut self, db: &mut Db) -> Result<&[Record]> {
        if self.items.is_none() {
            let query = self.query(db)?;
            self.items = Some(db.fetch_class(self.target(), query)?);
        }

        Ok(self.items.as_deref().unwrap_or_default())
    }

    pub fn ids(&mut self, db: &mut Db) -> Result<Vec<u64>> {
        Ok(self.items(db)?.iter().filter_map(Record::id).collect())
    }

    pub fn count(&mut self, db: &mut Db) -> Result<u64> {
        let query = self.query(db)?;
        let column = base_query::id_column(&self.schema, self.target());
        db.unlimited_row_count(&query, column)
    }

    pub fn add<'a>(&mut self, db: &mut Db, item: impl Into<RelationItem<'a>>) -> Result<()> {
        self.add_with(db, item, &[])
    }

    /// Adds `item`, storing `extra_fields` on the join row of a many-many
    /// list.
    ///
    /// A many-many add removes any existing join row for the pair before
    /// inserting the new one, so repeating an add leaves a single row.
    pub fn add_with<'a>(
        &mut self,
        db: &mut Db,
        item: impl Into<RelationItem<'a>>,
        extra_fields: &[(&str, Value)],
    ) -> Result<()> {
        let item = item.into();

        match &self.kind {
            Kind::HasMany(rel) => {
                if !extra_fields.is_empty() {
                    return Err(Error::invalid_statement(format!(
                        "has_many `{}` has no join row for extra fields",
                        rel.name
                    )));
                }

                with_record(db, rel.target, item, |db, record| {
                    record.set_field(&rel.join_column, self.owner_id)?;
                    record.write(db)?;
                    Ok(())
                })?;
            }
            Kind::ManyMany(rel) => {
                let child_id = match item {
                    RelationItem::Record(record) => match record.id() {
                        Some(id) => id,
                        None => record.write(db)?,
                    },
                    RelationItem::Id(id) => id,
                };

                let mut insert = Insert::new(&rel.join_table)
                    .value(&rel.local_key, self.owner_id)
                    .value(&rel.foreign_key, child_id);

                for (name, value) in extra_fields {
                    let ty = rel.extra_fields.get(*name).ok_or_else(|| {
                        Error::unknown_field(&rel.join_table, *name)
                    })?;
                    insert = insert.value(*name, ty.coerce(value.clone())?);
                }

                db.transaction(|db| {
                    db.execute(&unlink(rel, self.owner_id, Some(child_id)).into())?;
                    db.execute(&insert.into())?;
                    Ok(())
                })?;
            }
        }

        self.items = None;
        Ok(())
    }

    /// Detaches `item`. `has_many` children keep existing with their
    /// foreign key cleared; many-many lists only lose the join row.
    pub fn remove<'a>(&mut self, db: &mut Db, item: impl Into<RelationItem<'a>>) -> Result<()> {
        let item = item.into();

        match &self.kind {
            Kind::HasMany(rel) => {
                with_record(db, rel.target, item, |db, record| {
                    if record.get_field(&rel.join_column)?.to_id() == Some(self.owner_id) {
                        record.set_field(&rel.join_column, Value::Null)?;
                        record.write(db)?;
                    }
                    Ok(())
                })?;
            }
            Kind::ManyMany(rel) => {
                let child_id = match item {
                    RelationItem::Record(record) => record.id(),
                    RelationItem::Id(id) => Some(id),
                };

                if let Some(child_id) = child_id {
                    db.execute(&unlink(rel, self.owner_id, Some(child_id)).into())?;
                }
            }
        }

        self.items = None;
        Ok(())
    }

    pub fn remove_all(&mut self, db: &mut Db) -> Result<()> {
        match &self.kind {
            Kind::HasMany(rel) => {
                let query = self.query(db)?;
                let children = db.fetch_class(rel.target, query)?;

                for mut child in children {
                    child.set_field(&rel.join_column, Value::Null)?;
                    child.write(db)?;
                }
            }
            Kind::ManyMany(rel) => {
                db.execute(&unlink(rel, self.owner_id, None).into())?;
            }
        }

        self.items = None;
        Ok(())
    }

    /// Makes the list hold exactly `ids`, adding and removing only the
    /// difference.
    pub fn set_to_id_list(&mut self, db: &mut Db, ids: &[u64]) -> Result<()> {
        let current = self.ids(db)?;
        let existing = current.iter().copied().collect::<HashSet<_>>();
        let wanted = ids.iter().copied().collect::<HashSet<_>>();

        let mut added = HashSet::new();

        for &id in ids {
            if !existing.contains(&id) && added.insert(id) {
                self.add(db, id)?;
            }
        }

        for id in current {
            if !wanted.contains(&id) {
                self.remove(db, id)?;
            }
        }

        Ok(())
    }

    /// The extra columns of the join row linking the owner to `id`.
    pub fn extra_fields(&self, db: &mut Db, id: u64) -> Result<Row> {
        let Kind::ManyMany(rel) = &self.kind else {
            return Ok(Row::new());
        };

        if rel.extra_fields.is_empty() {
            return Ok(Row::new());
        }

        let join = &rel.join_table;
        let mut query = SqlQuery::new();
        query
            .from(join)
            .filter(Expr::eq(Expr::column(join, &rel.local_key), self.owner_id))
            .filter(Expr::eq(Expr::column(join, &rel.foreign_key), id))
            .limit(1);

        for extra in rel.extra_fields.keys() {
            query.select_column(join, extra);
        }

        let row = db.query(query)?.into_iter().next().ok_or_else(|| {
            Error::record_not_found(format!("{join} row for {}={id}", rel.foreign_key))
        })?;

        row.into_iter()
            .map(|(name, value)| {
                let value = match rel.extra_fields.get(&name) {
                    Some(ty) => ty.coerce(value)?,
                    None => value,
                };
                Ok((name, value))
            })
            .collect()
    }
}

/// Loads the target for an id, or uses the record handed in.
fn with_record(
    db: &mut Db,
    target: ClassId,
    item: RelationItem<'_>,
    f: impl FnOnce(&mut Db, &mut Record) -> Result<()>,
) -> Result<()> {
    match item {
        RelationItem::Record(record) => f(db, record),
        RelationItem::Id(id) => {
            let mut record = db.get_class(target, id)?;
            f(db, &mut record)
        }
    }
}

/// Deletes the join rows of `owner`, or only the one linking it to `child`.
fn unlink(rel: &ManyMany, owner: u64, child: Option<u64>) -> Delete {
    let owned = Expr::eq(Expr::unqualified(&rel.local_key), owner);

    let filter = match child {
        Some(child) => Expr::and(owned, Expr::eq(Expr::unqualified(&rel.foreign_key), child)),
        None => owned,
    };

    Delete::new(&rel.join_table).filter(filter)
}

impl<'a> From<&'a mut Record> for RelationItem<'a> {
    fn from(value: &'a mut Record) -> Self {
        RelationItem::Record(value)
    }
}

impl From<u64> for RelationItem<'_> {
    fn from(value: u64) -> Self {
        RelationItem::Id(value)
    }
}
