mod list;
pub use list::{RelationItem, RelationList};

use crate::{base_query, Db, Record, Result};

use strata_core::{
    schema::app::{BelongsTo, HasOne, Relation},
    stmt::Value,
    Error,
};
use strata_sql::stmt::Expr;

impl Record {
    /// The record this one points at through `name`'s foreign key.
    ///
    /// Returns an empty, unsaved instance of the target class when the key
    /// is unset or names no row, so callers can read fields without a
    /// separate existence check.
    pub fn has_one(&self, db: &mut Db, name: &str) -> Result<Record> {
        let rel = self.lookup_has_one(name)?.clone();

        let found = match self.get_field(&rel.foreign_key)?.to_id() {
            Some(id) => db.find_class(rel.target, id)?,
            None => None,
        };

        Ok(found.unwrap_or_else(|| Record::new(self.schema().clone(), rel.target)))
    }

    /// Points `name`'s foreign key at `target`, clearing it when `target`
    /// has not been written.
    pub fn set_has_one(&mut self, name: &str, target: &Record) -> Result<()> {
        let rel = self.lookup_has_one(name)?.clone();

        if !self.schema().is_a(target.class_id(), rel.target) {
            return Err(Error::invalid_statement(format!(
                "`{name}` on `{}` expects a `{}`, got a `{}`",
                self.class_name(),
                self.schema().class(rel.target).name,
                target.class_name()
            )));
        }

        self.set_field(&rel.foreign_key, Value::from(target.id()))
    }

    /// The record whose `has_one` points back at this one. Empty when there
    /// is none.
    pub fn belongs_to(&self, db: &mut Db, name: &str) -> Result<Record> {
        let rel: BelongsTo = match self.schema().relation(self.class_id(), name)? {
            Relation::BelongsTo(rel) => rel.clone(),
            _ => return Err(self.wrong_kind(name, "belongs_to")),
        };

        let Some(id) = self.id() else {
            return Ok(Record::new(self.schema().clone(), rel.target));
        };

        let column = base_query::field_column(self.schema(), rel.target, &rel.foreign_key)?;
        let mut query = db.shared.base_query(rel.target, true);
        query.filter(Expr::eq(column, id)).limit(1);

        Ok(db
            .fetch_class(rel.target, query)?
            .into_iter()
            .next()
            .unwrap_or_else(|| Record::new(self.schema().clone(), rel.target)))
    }

    pub fn has_many(&self, name: &str) -> Result<RelationList> {
        match self.schema().relation(self.class_id(), name)? {
            Relation::HasMany(_) => self.relation_list(name),
            _ => Err(self.wrong_kind(name, "has_many")),
        }
    }

    pub fn many_many(&self, name: &str) -> Result<RelationList> {
        match self.schema().relation(self.class_id(), name)? {
            Relation::ManyMany(_) => self.relation_list(name),
            _ => Err(self.wrong_kind(name, "many_many")),
        }
    }

    /// The list behind `name`, whichever kind of list relation it is.
    pub fn relation_list(&self, name: &str) -> Result<RelationList> {
        let relation = self.schema().relation(self.class_id(), name)?.clone();
        let owner_id = self.require_id("list relations of")?;

        RelationList::new(self.schema().clone(), owner_id, relation)
    }

    fn lookup_has_one(&self, name: &str) -> Result<&HasOne> {
        self.schema()
            .relation(self.class_id(), name)?
            .as_has_one()
            .ok_or_else(|| self.wrong_kind(name, "has_one"))
    }

    fn wrong_kind(&self, name: &str, expected: &str) -> Error {
        Error::invalid_schema(format!(
            "relation `{name}` on `{}` is not a {expected}",
            self.class_name()
        ))
    }
}
