use super::Record;
use crate::{Result, Stage};

use indexmap::IndexMap;
use std::sync::Arc;
use strata_core::{
    schema::{app::ClassId, CLASS_NAME, ID},
    stmt::{Row, Value},
    Schema,
};

impl Record {
    /// Builds a loaded record from a result row.
    ///
    /// The concrete class comes from the row's discriminator. A
    /// discriminator that names no class of `requested`'s hierarchy falls
    /// back to `requested` rather than failing the read.
    pub(crate) fn hydrate(
        schema: &Arc<Schema>,
        requested: ClassId,
        mut row: Row,
        stage: Stage,
    ) -> Result<Record> {
        let class = resolve_class(schema, requested, row.get(CLASS_NAME));
        let id = row.shift_remove(ID).and_then(|id| id.to_id());

        let mut fields = IndexMap::new();

        for (name, ty) in schema.database_fields(class) {
            if name == ID {
                continue;
            }

            let value = row.shift_remove(name).unwrap_or_default();

            let value = if name == CLASS_NAME {
                Value::from(&schema.class(class).name)
            } else {
                ty.coerce(value)?
            };

            fields.insert(name.clone(), value);
        }

        // Columns the query selected on top of the class's own, such as
        // join table extras.
        for (name, value) in row {
            if !schema.is_known_column(&name) {
                fields.insert(name, value);
            }
        }

        Ok(Record {
            schema: schema.clone(),
            class,
            id,
            original: fields.clone(),
            fields,
            changed: IndexMap::new(),
            stage,
            migrating_version: None,
        })
    }
}

fn resolve_class(schema: &Schema, requested: ClassId, discriminator: Option<&Value>) -> ClassId {
    let Some(name) = discriminator.and_then(Value::as_str) else {
        return requested;
    };

    match schema.class_by_name(name) {
        Some(class) if class.root_id() == schema.class(requested).root_id() => class.id,
        _ => {
            tracing::warn!(
                requested = %schema.class(requested).name,
                discriminator = name,
                "unknown discriminator; using the requested class"
            );
            requested
        }
    }
}
