use super::Db;
use crate::Result;

use strata_core::driver::operation::Transaction;

impl Db {
    /// Runs `f` inside a transaction, committing when it returns `Ok` and
    /// rolling back otherwise.
    ///
    /// Calls nest: an inner call opens a savepoint that is released on
    /// success and rolled back to on failure, leaving the outer transaction
    /// running.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut Db) -> Result<T>) -> Result<T> {
        let depth = self.depth;

        let (begin, commit) = match depth {
            0 => (Transaction::Start, Transaction::Commit),
            n => (Transaction::Savepoint(n), Transaction::ReleaseSavepoint(n)),
        };

        self.cx().transaction(begin)?;

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        match result {
            Ok(value) => match self.cx().transaction(commit) {
                Ok(()) => Ok(value),
                Err(err) => {
                    self.rollback(depth);
                    Err(err)
                }
            },
            Err(err) => {
                self.rollback(depth);
                Err(err)
            }
        }
    }

    /// Undoes the scope opened at `depth`. Failures are logged; the error
    /// that caused the rollback is the one reported.
    fn rollback(&mut self, depth: usize) {
        let ops = match depth {
            0 => vec![Transaction::Rollback],
            n => vec![
                Transaction::RollbackToSavepoint(n),
                Transaction::ReleaseSavepoint(n),
            ],
        };

        for op in ops {
            if let Err(err) = self.cx().transaction(op) {
                tracing::warn!(%err, depth, ?op, "failed to roll back transaction");
                return;
            }
        }
    }
}
