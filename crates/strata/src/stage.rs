use crate::{Db, Result};

use chrono::NaiveDateTime;
use std::ops::{Deref, DerefMut};

/// The named revision of a versioned record that reads and writes target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    #[default]
    Draft,
    Live,
}

impl Stage {
    /// Suffix of the physical tables holding this stage. Draft rows live in
    /// the base tables.
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Stage::Draft => None,
            Stage::Live => Some("_Live"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Draft => "Draft",
            Stage::Live => "Live",
        }
    }
}

/// Which data reads and writes on a [`Db`] see.
///
/// When `archived` is set, reads return every versioned record as it stood
/// at that moment and writes are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageContext {
    pub stage: Stage,
    pub archived: Option<NaiveDateTime>,
}

impl StageContext {
    pub fn stage(stage: Stage) -> StageContext {
        StageContext {
            stage,
            archived: None,
        }
    }

    pub fn archived(at: NaiveDateTime) -> StageContext {
        StageContext {
            stage: Stage::Draft,
            archived: Some(at),
        }
    }

    pub fn is_archived(&self) -> bool {
        self.archived.is_some()
    }
}

/// Installs a [`StageContext`] on a [`Db`] for as long as the guard lives
/// and restores the previous one when dropped.
///
/// ```no_run
/// # fn demo(db: &mut strata::Db) -> strata::Result<()> {
/// use strata::{Stage, StageContext};
///
/// let mut live = db.scoped(StageContext::stage(Stage::Live));
/// let pages = live.all("Page")?;
/// # Ok(())
/// # }
/// ```
pub struct StageGuard<'a> {
    db: &'a mut Db,
    previous: StageContext,
}

impl Db {
    pub fn context(&self) -> StageContext {
        self.context
    }

    /// Replaces the context until changed again. Prefer [`Db::scoped`] for
    /// temporary switches.
    pub fn set_context(&mut self, context: StageContext) {
        self.context = context;
    }

    pub fn scoped(&mut self, context: StageContext) -> StageGuard<'_> {
        let previous = std::mem::replace(&mut self.context, context);
        StageGuard { db: self, previous }
    }

    /// Runs `f` with `context` installed, restoring the previous context on
    /// every exit path.
    pub fn with_context<T>(
        &mut self,
        context: StageContext,
        f: impl FnOnce(&mut Db) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.scoped(context);
        f(&mut guard)
    }

    pub fn with_stage<T>(&mut self, stage: Stage, f: impl FnOnce(&mut Db) -> Result<T>) -> Result<T> {
        self.with_context(StageContext::stage(stage), f)
    }
}

impl Deref for StageGuard<'_> {
    type Target = Db;

    fn deref(&self) -> &Db {
        self.db
    }
}

impl DerefMut for StageGuard<'_> {
    fn deref_mut(&mut self) -> &mut Db {
        self.db
    }
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        self.db.context = self.previous;
    }
}
