/// Storage types as they appear in `CREATE TABLE` statements.
///
/// Each [`ColumnType`](crate::schema::app::ColumnType) maps onto exactly one
/// of these through `storage_ty()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Real,
    Text,
    VarChar(u32),
    DateTime,
}
