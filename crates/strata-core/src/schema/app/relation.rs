mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::HasMany;

mod has_one;
pub use has_one::HasOne;

mod many_many;
pub use many_many::ManyMany;

use super::ClassId;

/// A resolved relation: targets are class ids and every key column is known.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    HasOne(HasOne),
    BelongsTo(BelongsTo),
    HasMany(HasMany),
    ManyMany(ManyMany),
}

impl Relation {
    pub fn name(&self) -> &str {
        match self {
            Relation::HasOne(rel) => &rel.name,
            Relation::BelongsTo(rel) => &rel.name,
            Relation::HasMany(rel) => &rel.name,
            Relation::ManyMany(rel) => &rel.name,
        }
    }

    pub fn target(&self) -> ClassId {
        match self {
            Relation::HasOne(rel) => rel.target,
            Relation::BelongsTo(rel) => rel.target,
            Relation::HasMany(rel) => rel.target,
            Relation::ManyMany(rel) => rel.target,
        }
    }

    pub fn as_has_one(&self) -> Option<&HasOne> {
        match self {
            Relation::HasOne(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match self {
            Relation::BelongsTo(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn as_has_many(&self) -> Option<&HasMany> {
        match self {
            Relation::HasMany(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn as_many_many(&self) -> Option<&ManyMany> {
        match self {
            Relation::ManyMany(rel) => Some(rel),
            _ => None,
        }
    }

    /// `true` for relations backed by a list of records.
    pub fn is_list(&self) -> bool {
        matches!(self, Relation::HasMany(_) | Relation::ManyMany(_))
    }
}
