mod table;

use super::{
    app::{
        BelongsTo, Class, ClassDef, ClassId, ColumnType, ExtraStatics, HasMany, HasOne, ManyMany,
        Relation, RelationDef,
    },
    db::{Table, TableId},
    Schema, CLASS_NAME, CREATED, ID, LAST_EDITED, RESERVED_FIELDS,
};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashMap;

/// Collects class declarations and resolves them into a [`Schema`].
#[derive(Debug, Default)]
pub struct Builder {
    classes: Vec<ClassDef>,
}

/// Used to track state during the build process
struct BuildSchema {
    /// Declarations with extension statics merged in
    defs: Vec<ClassDef>,

    /// Maps class names to identifiers, assigned in registration order.
    class_lookup: HashMap<String, ClassId>,

    /// Classes as they are built
    classes: Vec<Class>,

    /// Tables as they are built
    tables: Vec<Table>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: ClassDef) -> &mut Self {
        self.classes.push(class);
        self
    }

    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    pub fn build(&self) -> Result<Schema> {
        self.build_with(|_| ExtraStatics::default())
    }

    /// Builds the schema, first merging whatever `extra_statics` returns for
    /// each declaration into it.
    pub fn build_with(&self, extra_statics: impl Fn(&ClassDef) -> ExtraStatics) -> Result<Schema> {
        let mut defs = self.classes.clone();

        for def in &mut defs {
            let extra = extra_statics(def);
            def.merge(extra);
        }

        let mut builder = BuildSchema::new(defs)?;
        builder.build_classes()?;
        builder.build_class_tables()?;
        builder.build_relations()?;
        builder.build_join_tables();

        let schema = builder.finish()?;

        // Verify the schema structure
        schema.verify()?;

        Ok(schema)
    }
}

impl BuildSchema {
    fn new(defs: Vec<ClassDef>) -> Result<BuildSchema> {
        let mut class_lookup = HashMap::new();

        for (i, def) in defs.iter().enumerate() {
            if class_lookup.insert(def.name.clone(), ClassId(i)).is_some() {
                return Err(Error::invalid_schema(format!(
                    "class `{}` is registered twice",
                    def.name
                )));
            }
        }

        Ok(BuildSchema {
            defs,
            class_lookup,
            classes: vec![],
            tables: vec![],
        })
    }

    fn lookup(&self, name: &str, referenced_by: &str) -> Result<ClassId> {
        self.class_lookup.get(name).copied().ok_or_else(|| {
            Error::invalid_schema(format!(
                "class `{referenced_by}` references unknown class `{name}`"
            ))
        })
    }

    fn build_classes(&mut self) -> Result<()> {
        let mut parents = Vec::with_capacity(self.defs.len());

        for def in &self.defs {
            let parent = match &def.parent {
                Some(parent) => Some(self.lookup(parent, &def.name)?),
                None => None,
            };
            parents.push(parent);
        }

        let mut ancestries = Vec::with_capacity(self.defs.len());

        for (i, def) in self.defs.iter().enumerate() {
            let mut chain = vec![ClassId(i)];
            let mut current = parents[i];

            while let Some(parent) = current {
                if chain.contains(&parent) {
                    return Err(Error::invalid_schema(format!(
                        "inheritance cycle through class `{}`",
                        def.name
                    )));
                }
                chain.push(parent);
                current = parents[parent.0];
            }

            chain.reverse();
            ancestries.push(chain);
        }

        let mut own_fields = Vec::with_capacity(self.defs.len());

        for def in &self.defs {
            let mut fields = IndexMap::new();

            for (name, ty) in &def.fields {
                if RESERVED_FIELDS.contains(&name.as_str()) {
                    return Err(Error::invalid_schema(format!(
                        "field `{name}` on class `{}` is reserved",
                        def.name
                    )));
                }
                fields.insert(name.clone(), ty.clone());
            }

            for relation in &def.relations {
                if let RelationDef::HasOne { name, .. } = relation {
                    fields
                        .entry(format!("{name}ID"))
                        .or_insert(ColumnType::ForeignKey);
                }
            }

            own_fields.push(fields);
        }

        for (i, def) in self.defs.iter().enumerate() {
            let ancestry = ancestries[i].clone();
            let root = ancestry[0];

            let hierarchy = ancestries
                .iter()
                .enumerate()
                .filter(|(_, chain)| chain[0] == root)
                .map(|(j, _)| self.defs[j].name.clone())
                .collect::<Vec<_>>();

            let mut database_fields = IndexMap::new();
            database_fields.insert(ID.to_string(), ColumnType::Int);
            database_fields.insert(CLASS_NAME.to_string(), ColumnType::Enum(hierarchy));
            database_fields.insert(CREATED.to_string(), ColumnType::Timestamp);
            database_fields.insert(LAST_EDITED.to_string(), ColumnType::Timestamp);

            let mut defaults = IndexMap::new();

            for ancestor in &ancestry {
                for (name, ty) in &own_fields[ancestor.0] {
                    database_fields.insert(name.clone(), ty.clone());
                }

                for (name, value) in &self.defs[ancestor.0].defaults {
                    defaults.insert(name.clone(), value.clone());
                }
            }

            for name in defaults.keys() {
                if !database_fields.contains_key(name) {
                    return Err(Error::invalid_schema(format!(
                        "class `{}` has a default for unknown field `{name}`",
                        def.name
                    )));
                }
            }

            let mut descendants = ancestries
                .iter()
                .enumerate()
                .filter(|(j, chain)| *j != i && chain.contains(&ClassId(i)))
                .map(|(j, chain)| (ClassId(j), chain.len()))
                .collect::<Vec<_>>();
            descendants.sort_by(|a, b| b.1.cmp(&a.1));

            self.classes.push(Class {
                id: ClassId(i),
                name: def.name.clone(),
                parent: parents[i],
                table: TableId(i),
                ancestry,
                descendants: descendants.into_iter().map(|(id, _)| id).collect(),
                fields: own_fields[i].clone(),
                database_fields,
                defaults,
                relations: IndexMap::new(),
            });
        }

        Ok(())
    }

    fn build_relations(&mut self) -> Result<()> {
        // `belongs_many_many` resolves against the declaring side's
        // `many_many`, so those wait for the first pass.
        for pass in [false, true] {
            for i in 0..self.defs.len() {
                for def in self.defs[i].relations.clone() {
                    let reverse = matches!(def, RelationDef::BelongsManyMany { .. });
                    if reverse != pass {
                        continue;
                    }

                    let relation = self.resolve_relation(ClassId(i), &def)?;
                    let relations = &mut self.classes[i].relations;

                    if relations
                        .insert(relation.name().to_string(), relation)
                        .is_some()
                    {
                        return Err(Error::invalid_schema(format!(
                            "relation `{}` is declared twice on class `{}`",
                            def.name(),
                            self.classes[i].name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn resolve_relation(&self, owner: ClassId, def: &RelationDef) -> Result<Relation> {
        let owner_name = &self.classes[owner.0].name;
        let target = self.lookup(def.target(), owner_name)?;

        Ok(match def {
            RelationDef::HasOne { name, .. } => Relation::HasOne(HasOne {
                name: name.clone(),
                target,
                foreign_key: format!("{name}ID"),
            }),
            RelationDef::BelongsTo { name, .. } => {
                let foreign_key = self.find_has_one_back(target, owner).ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "belongs_to `{name}` on `{owner_name}`: `{}` has no has_one pointing at it",
                        def.target()
                    ))
                })?;

                Relation::BelongsTo(BelongsTo {
                    name: name.clone(),
                    target,
                    foreign_key,
                })
            }
            RelationDef::HasMany {
                name, join_column, ..
            } => {
                let join_column = match join_column {
                    Some(column) => {
                        if !self.classes[target.0].database_fields.contains_key(column) {
                            return Err(Error::invalid_schema(format!(
                                "has_many `{name}` on `{owner_name}`: `{}` has no column `{column}`",
                                def.target()
                            )));
                        }
                        column.clone()
                    }
                    None => self.find_has_one_back(target, owner).ok_or_else(|| {
                        Error::invalid_schema(format!(
                            "has_many `{name}` on `{owner_name}`: `{}` has no has_one pointing at it",
                            def.target()
                        ))
                    })?,
                };

                Relation::HasMany(HasMany {
                    name: name.clone(),
                    target,
                    join_column,
                })
            }
            RelationDef::ManyMany {
                name, extra_fields, ..
            } => {
                let target_name = &self.classes[target.0].name;

                Relation::ManyMany(ManyMany {
                    name: name.clone(),
                    owner,
                    target,
                    join_table: format!("{owner_name}_{name}"),
                    local_key: format!("{owner_name}ID"),
                    foreign_key: if target == owner {
                        "ChildID".to_string()
                    } else {
                        format!("{target_name}ID")
                    },
                    extra_fields: extra_fields.clone(),
                    reverse: false,
                })
            }
            RelationDef::BelongsManyMany { name, relation, .. } => {
                let forward = self.classes[target.0]
                    .ancestry
                    .iter()
                    .flat_map(|class| self.classes[class.0].relations.values())
                    .filter_map(Relation::as_many_many)
                    .filter(|rel| !rel.reverse)
                    .filter(|rel| self.classes[owner.0].ancestry.contains(&rel.target))
                    .find(|rel| relation.as_ref().map_or(true, |r| *r == rel.name))
                    .ok_or_else(|| {
                        Error::invalid_schema(format!(
                            "belongs_many_many `{name}` on `{owner_name}`: `{}` has no many_many pointing at it",
                            def.target()
                        ))
                    })?;

                Relation::ManyMany(ManyMany {
                    name: name.clone(),
                    owner,
                    target,
                    join_table: forward.join_table.clone(),
                    local_key: forward.foreign_key.clone(),
                    foreign_key: forward.local_key.clone(),
                    extra_fields: forward.extra_fields.clone(),
                    reverse: true,
                })
            }
        })
    }

    /// Finds the foreign key column of a `has_one` declared in `target`'s
    /// ancestry that points at `owner` or one of its ancestors.
    fn find_has_one_back(&self, target: ClassId, owner: ClassId) -> Option<String> {
        let owner_ancestry = &self.classes[owner.0].ancestry;

        self.classes[target.0]
            .ancestry
            .iter()
            .flat_map(|class| self.defs[class.0].relations.iter())
            .find_map(|relation| match relation {
                RelationDef::HasOne { name, target } => {
                    let pointee = self.class_lookup.get(target)?;
                    owner_ancestry
                        .contains(pointee)
                        .then(|| format!("{name}ID"))
                }
                _ => None,
            })
    }

    fn finish(self) -> Result<Schema> {
        let mut table_lookup = HashMap::new();

        for table in &self.tables {
            if table_lookup.insert(table.name.clone(), table.id).is_some() {
                return Err(Error::invalid_schema(format!(
                    "more than one table is named `{}`",
                    table.name
                )));
            }
        }

        Ok(Schema {
            classes: self.classes,
            tables: self.tables,
            class_lookup: self.class_lookup,
            table_lookup,
        })
    }
}
