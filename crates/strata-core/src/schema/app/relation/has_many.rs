use super::ClassId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasMany {
    pub name: String,

    /// Class of the child records
    pub target: ClassId,

    /// Foreign key column on the target pointing at the owner
    pub join_column: String,
}
