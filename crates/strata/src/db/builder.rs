use super::{Connect, Db, Shared};
use crate::{Clock, Extension, Hooks, Result, SystemClock};

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use strata_core::{
    driver::Driver,
    schema::{
        self,
        app::{ClassDef, ClassId, ExtraStatics},
    },
    Error,
};

#[derive(Debug, Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    /// Hooks keyed by class name, resolved when the schema is built
    hooks: Vec<(String, Arc<dyn Hooks>)>,

    extensions: Vec<Arc<dyn Extension>>,

    clock: Option<Arc<dyn Clock>>,

    author: Option<u64>,
}

impl Builder {
    pub fn register(&mut self, class: ClassDef) -> &mut Self {
        self.core.register(class);
        self
    }

    /// Attaches lifecycle hooks to `class` and every class extending it.
    pub fn hooks(&mut self, class: impl Into<String>, hooks: impl Hooks) -> &mut Self {
        self.hooks.push((class.into(), Arc::new(hooks)));
        self
    }

    /// Registers an overlay. Extensions run in the order they are
    /// registered.
    pub fn extension<E: Extension>(&mut self, extension: Arc<E>) -> &mut Self {
        self.extensions.push(extension);
        self
    }

    /// Defaults to [`SystemClock`].
    pub fn clock(&mut self, clock: Arc<dyn Clock>) -> &mut Self {
        self.clock = Some(clock);
        self
    }

    pub fn author(&mut self, author: u64) -> &mut Self {
        self.author = Some(author);
        self
    }

    pub fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connect::new(url)?)
    }

    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let extensions = self.extensions.clone();

        let schema = self.core.build_with(|class| {
            let mut extra = ExtraStatics::default();

            for extension in &extensions {
                let statics = extension.extra_statics(class);
                extra.fields.extend(statics.fields);
                extra.defaults.extend(statics.defaults);
                extra.has_one.extend(statics.has_one);
                extra.indices.extend(statics.indices);
            }

            extra
        })?;

        let mut hooks: HashMap<ClassId, Vec<Arc<dyn Hooks>>> = HashMap::new();

        for (name, class_hooks) in &self.hooks {
            let class = schema.class_by_name(name).ok_or_else(|| {
                Error::invalid_schema(format!("hooks registered for unknown class `{name}`"))
            })?;
            hooks.entry(class.id).or_default().push(class_hooks.clone());
        }

        let connection = driver.connect()?;

        tracing::debug!(
            url = %driver.url(),
            classes = schema.classes.len(),
            extensions = extensions.len(),
            "database handle ready"
        );

        let shared = Arc::new(Shared {
            schema: Arc::new(schema),
            extensions,
            hooks,
            clock: self
                .clock
                .clone()
                .unwrap_or_else(|| Arc::new(SystemClock)),
            base_queries: RwLock::new(HashMap::new()),
        });

        Ok(Db {
            shared,
            connection,
            context: Default::default(),
            memo: HashMap::new(),
            depth: 0,
            author: self.author,
        })
    }
}
