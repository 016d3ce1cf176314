use super::*;
use strata_core::{schema::ID, Error, Result};

use indexmap::IndexMap;

/// The per-table operations one record write (or delete) will issue,
/// keyed by physical table name.
///
/// A manipulation is handed to every write interceptor before execution so
/// extensions can redirect it to other tables or add operations of their
/// own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manipulation {
    ops: IndexMap<String, TableOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableOp {
    pub command: Command,

    /// Column values to write. Ignored by deletes.
    pub fields: IndexMap<String, Value>,

    /// Row the operation targets. Inserts without an id let the database
    /// assign one.
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert,
    Update,
    Delete,
}

impl Manipulation {
    pub fn new() -> Manipulation {
        Manipulation::default()
    }

    /// Adds or replaces the operation for `table`.
    pub fn insert(&mut self, table: impl Into<String>, op: TableOp) {
        self.ops.insert(table.into(), op);
    }

    pub fn get(&self, table: &str) -> Option<&TableOp> {
        self.ops.get(table)
    }

    pub fn get_mut(&mut self, table: &str) -> Option<&mut TableOp> {
        self.ops.get_mut(table)
    }

    pub fn get_or_insert_with(
        &mut self,
        table: impl Into<String>,
        f: impl FnOnce() -> TableOp,
    ) -> &mut TableOp {
        self.ops.entry(table.into()).or_insert_with(f)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.ops.contains_key(table)
    }

    pub fn remove(&mut self, table: &str) -> Option<TableOp> {
        self.ops.shift_remove(table)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableOp)> + '_ {
        self.ops.iter().map(|(table, op)| (table.as_str(), op))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut TableOp)> + '_ {
        self.ops.iter_mut().map(|(table, op)| (table.as_str(), op))
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.keys().map(String::as_str)
    }

    /// Moves the operation on `from` to `to`, keeping its position.
    pub fn rename_table(&mut self, from: &str, to: impl Into<String>) {
        let to = to.into();
        self.map_tables(|table| if table == from { to.clone() } else { table.to_string() });
    }

    /// Renames every table through `f`, keeping operation order.
    pub fn map_tables(&mut self, mut f: impl FnMut(&str) -> String) {
        self.ops = std::mem::take(&mut self.ops)
            .into_iter()
            .map(|(table, op)| (f(&table), op))
            .collect();
    }
}

impl IntoIterator for Manipulation {
    type Item = (String, TableOp);
    type IntoIter = indexmap::map::IntoIter<String, TableOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manipulation {
    type Item = (&'a String, &'a TableOp);
    type IntoIter = indexmap::map::Iter<'a, String, TableOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl TableOp {
    pub fn insert(id: Option<u64>) -> TableOp {
        TableOp::new(Command::Insert, id)
    }

    pub fn update(id: u64) -> TableOp {
        TableOp::new(Command::Update, Some(id))
    }

    pub fn delete(id: u64) -> TableOp {
        TableOp::new(Command::Delete, Some(id))
    }

    fn new(command: Command, id: Option<u64>) -> TableOp {
        TableOp {
            command,
            fields: IndexMap::new(),
            id,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> TableOp {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn is_insert(&self) -> bool {
        self.command == Command::Insert
    }

    pub fn is_update(&self) -> bool {
        self.command == Command::Update
    }

    pub fn is_delete(&self) -> bool {
        self.command == Command::Delete
    }

    /// Builds the statement executing this operation against `table`.
    pub fn to_statement(&self, table: &str) -> Result<Statement> {
        match self.command {
            Command::Insert => Ok(self.to_insert(table).into()),
            Command::Update => {
                let id = self.require_id(table)?;
                let mut update = Update::new(table).filter(Expr::eq(Expr::unqualified(ID), id));
                for (column, value) in &self.fields {
                    update = update.set(column.clone(), value.clone());
                }
                Ok(update.into())
            }
            Command::Delete => {
                let id = self.require_id(table)?;
                Ok(Delete::new(table)
                    .filter(Expr::eq(Expr::unqualified(ID), id))
                    .into())
            }
        }
    }

    /// The insert carrying this operation's id and fields, regardless of
    /// its command. Updates that match no row fall back to this.
    pub fn to_insert(&self, table: &str) -> Insert {
        let mut insert = Insert::new(table);

        if let Some(id) = self.id {
            insert = insert.value(ID, id);
        }

        for (column, value) in &self.fields {
            if column == ID {
                continue;
            }
            insert = insert.value(column.clone(), value.clone());
        }

        insert
    }

    fn require_id(&self, table: &str) -> Result<u64> {
        self.id.ok_or_else(|| {
            Error::invalid_statement(format!(
                "{:?} on `{table}` requires a record id",
                self.command
            ))
        })
    }
}
