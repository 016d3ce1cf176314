use super::ClassId;

/// Reverse of a [`HasOne`](super::HasOne): the target stores the declaring
/// record's id in `foreign_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BelongsTo {
    pub name: String,

    pub target: ClassId,

    /// Column on the target holding the declaring record's id
    pub foreign_key: String,
}
