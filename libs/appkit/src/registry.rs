use axum::Router;
use std::sync::Arc;
use tracing::info;

use crate::context::ModuleCtx;
use crate::contracts::{DbModule, Module, RestfulModule};

struct Entry {
    core: Arc<dyn Module>,
    db: Option<Arc<dyn DbModule>>,
    rest: Option<Arc<dyn RestfulModule>>,
}

/// Ordered set of modules; every phase visits them in registration order,
/// so providers of hub clients must be registered before their consumers.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: Vec<Entry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module<M: Module>(mut self, module: Arc<M>) -> Self {
        self.entries.push(Entry {
            core: module,
            db: None,
            rest: None,
        });
        self
    }

    /// Module with the db and rest capabilities.
    pub fn with_full_module<M>(mut self, module: Arc<M>) -> Self
    where
        M: Module + DbModule + RestfulModule,
    {
        self.entries.push(Entry {
            core: module.clone(),
            db: Some(module.clone()),
            rest: Some(module),
        });
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.core.name()).collect()
    }

    pub async fn run_init_phase(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        for e in &self.entries {
            let name = e.core.name();
            info!(module = name, "init");
            e.core
                .init(&ctx.for_module(name))
                .await
                .map_err(|err| err.context(format!("module '{name}' failed to init")))?;
        }
        Ok(())
    }

    pub async fn run_db_phase(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let Some(db) = ctx.db() else {
            return Ok(());
        };
        for e in &self.entries {
            if let Some(m) = &e.db {
                let name = e.core.name();
                info!(module = name, "migrate");
                m.migrate(&db)
                    .await
                    .map_err(|err| err.context(format!("module '{name}' failed to migrate")))?;
            }
        }
        Ok(())
    }

    pub fn run_rest_phase(&self, ctx: &ModuleCtx, mut router: Router) -> anyhow::Result<Router> {
        for e in &self.entries {
            if let Some(m) = &e.rest {
                let name = e.core.name();
                info!(module = name, "register rest");
                router = m
                    .register_rest(&ctx.for_module(name), router)
                    .map_err(|err| err.context(format!("module '{name}' failed to register routes")))?;
            }
        }
        Ok(router)
    }
}
