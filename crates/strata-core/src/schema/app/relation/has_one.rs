use super::ClassId;

/// The declaring class stores the target's id in `foreign_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasOne {
    pub name: String,

    pub target: ClassId,

    /// `{name}ID` on the declaring class
    pub foreign_key: String,
}
