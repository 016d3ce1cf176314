#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name is unique within the database
    pub name: String,

    /// Columns included in the index, in order.
    pub columns: Vec<String>,

    /// When `true`, indexed entries are unique
    pub unique: bool,
}
