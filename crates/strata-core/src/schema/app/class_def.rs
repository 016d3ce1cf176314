use super::ColumnType;
use crate::stmt::Value;

use indexmap::IndexMap;

/// Declaration of a record class, registered with the schema builder.
///
/// ```
/// use strata_core::schema::app::{ClassDef, ColumnType};
///
/// let article = ClassDef::new("Article")
///     .field("Title", ColumnType::Varchar(255))
///     .field("Content", ColumnType::Text)
///     .has_many("Comments", "Comment");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassDef {
    pub name: String,

    /// Name of the class this one extends. `None` for a root class.
    pub parent: Option<String>,

    pub fields: IndexMap<String, ColumnType>,

    pub defaults: IndexMap<String, Value>,

    pub relations: Vec<RelationDef>,

    pub indices: Vec<IndexDef>,
}

/// A relation as declared, before targets and keys are resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationDef {
    HasOne {
        name: String,
        target: String,
    },
    BelongsTo {
        name: String,
        target: String,
    },
    HasMany {
        name: String,
        target: String,
        join_column: Option<String>,
    },
    ManyMany {
        name: String,
        target: String,
        extra_fields: IndexMap<String, ColumnType>,
    },
    BelongsManyMany {
        name: String,
        target: String,
        relation: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Fields, `has_one` relations, defaults and indices an extension adds to a
/// class before the schema is resolved.
#[derive(Debug, Clone, Default)]
pub struct ExtraStatics {
    pub fields: IndexMap<String, ColumnType>,
    pub defaults: IndexMap<String, Value>,
    pub has_one: Vec<(String, String)>,
    pub indices: Vec<IndexDef>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> ClassDef {
        ClassDef {
            name: name.into(),
            ..ClassDef::default()
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Adds a `{name}ID` foreign key pointing at `target`.
    pub fn has_one(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relations.push(RelationDef::HasOne {
            name: name.into(),
            target: target.into(),
        });
        self
    }

    /// The reverse side of a `has_one` declared on `target`.
    pub fn belongs_to(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relations.push(RelationDef::BelongsTo {
            name: name.into(),
            target: target.into(),
        });
        self
    }

    /// One-to-many; the join column is taken from `target`'s `has_one`
    /// pointing back at this class.
    pub fn has_many(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relations.push(RelationDef::HasMany {
            name: name.into(),
            target: target.into(),
            join_column: None,
        });
        self
    }

    /// One-to-many through an explicitly named foreign key column on `target`.
    pub fn has_many_via(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        join_column: impl Into<String>,
    ) -> Self {
        self.relations.push(RelationDef::HasMany {
            name: name.into(),
            target: target.into(),
            join_column: Some(join_column.into()),
        });
        self
    }

    pub fn many_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.many_many_with(name, target, IndexMap::new())
    }

    /// Many-to-many whose join table carries `extra_fields` besides the two keys.
    pub fn many_many_with(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        extra_fields: IndexMap<String, ColumnType>,
    ) -> Self {
        self.relations.push(RelationDef::ManyMany {
            name: name.into(),
            target: target.into(),
            extra_fields,
        });
        self
    }

    /// The reverse view of a `many_many` declared on `target`.
    pub fn belongs_many_many(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relations.push(RelationDef::BelongsManyMany {
            name: name.into(),
            target: target.into(),
            relation: None,
        });
        self
    }

    pub fn index<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.push(IndexDef {
            columns: columns.into_iter().map(Into::into).collect(),
            unique: false,
        });
        self
    }

    pub fn unique_index<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.push(IndexDef {
            columns: columns.into_iter().map(Into::into).collect(),
            unique: true,
        });
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Folds what an extension contributes into this declaration. Fields
    /// already declared by the class win.
    pub fn merge(&mut self, extra: ExtraStatics) {
        for (name, ty) in extra.fields {
            self.fields.entry(name).or_insert(ty);
        }

        for (name, value) in extra.defaults {
            self.defaults.entry(name).or_insert(value);
        }

        for (name, target) in extra.has_one {
            self.relations.push(RelationDef::HasOne { name, target });
        }

        self.indices.extend(extra.indices);
    }
}

impl RelationDef {
    pub fn name(&self) -> &str {
        match self {
            RelationDef::HasOne { name, .. }
            | RelationDef::BelongsTo { name, .. }
            | RelationDef::HasMany { name, .. }
            | RelationDef::ManyMany { name, .. }
            | RelationDef::BelongsManyMany { name, .. } => name,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            RelationDef::HasOne { target, .. }
            | RelationDef::BelongsTo { target, .. }
            | RelationDef::HasMany { target, .. }
            | RelationDef::ManyMany { target, .. }
            | RelationDef::BelongsManyMany { target, .. } => target,
        }
    }
}

impl ExtraStatics {
    pub fn field(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.defaults.is_empty()
            && self.has_one.is_empty()
            && self.indices.is_empty()
    }
}
