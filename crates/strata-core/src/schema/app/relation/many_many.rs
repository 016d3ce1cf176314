use super::ClassId;
use crate::schema::app::ColumnType;

use indexmap::IndexMap;

/// Many-to-many through a join table.
///
/// The reverse view (`belongs_many_many`) shares the join table with the
/// declaring side and has its keys swapped.
#[derive(Debug, Clone, PartialEq)]
pub struct ManyMany {
    pub name: String,

    /// Class the relation is visible from
    pub owner: ClassId,

    pub target: ClassId,

    /// `{Owner}_{Relation}` of the declaring side
    pub join_table: String,

    /// Join table column holding the owner's id
    pub local_key: String,

    /// Join table column holding the target's id
    pub foreign_key: String,

    /// Columns of the join table besides the two keys
    pub extra_fields: IndexMap<String, ColumnType>,

    /// `true` when this is the `belongs_many_many` side
    pub reverse: bool,
}
