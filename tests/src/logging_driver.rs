use std::sync::{Arc, Mutex};
use strata_core::{
    driver::{Connection, Driver, Operation, Response},
    Result,
};

/// Wraps a driver and records every operation its connections execute
/// successfully.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Shared with every connection and with the test's [`ExecLog`](crate::ExecLog)
    ops_log: Arc<Mutex<Vec<Operation>>>,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<Operation>>> {
        self.ops_log.clone()
    }
}

impl Driver for LoggingDriver {
    fn url(&self) -> String {
        self.inner.url()
    }

    fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect()?,
            ops_log: self.ops_log_handle(),
        }))
    }
}

#[derive(Debug)]
struct LoggingConnection {
    inner: Box<dyn Connection>,
    ops_log: Arc<Mutex<Vec<Operation>>>,
}

impl Connection for LoggingConnection {
    fn exec(&mut self, operation: Operation) -> Result<Response> {
        let response = self.inner.exec(operation.clone())?;

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(operation);

        Ok(response)
    }
}
