use std::sync::{Arc, Mutex};
use strata_core::driver::Operation;

/// A wrapper around the operations log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<Operation>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<Operation>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Check if any operation matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops.lock().unwrap().iter().any(predicate)
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|&op| predicate(op))
            .count()
    }

    /// SQL of every statement that may have changed data, in order.
    pub fn writes(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.is_write())
            .filter_map(|op| op.sql().map(str::to_string))
            .collect()
    }

    /// SQL of every query, in order.
    pub fn queries(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| matches!(op, Operation::QuerySql(_)))
            .filter_map(|op| op.sql().map(str::to_string))
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first operation from the log
    pub fn pop(&mut self) -> Option<Operation> {
        let mut ops = self.ops.lock().unwrap();

        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0))
        }
    }
}
