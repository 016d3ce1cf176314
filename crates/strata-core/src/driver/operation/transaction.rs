use super::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    /// Start a transaction
    Start,

    /// Commit a transaction
    Commit,

    /// Rollback a transaction
    Rollback,

    /// Open a nested scope inside a running transaction
    Savepoint(usize),

    /// Fold a nested scope into its parent
    ReleaseSavepoint(usize),

    /// Undo everything since the matching savepoint
    RollbackToSavepoint(usize),
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Operation {
        Operation::Transaction(value)
    }
}
