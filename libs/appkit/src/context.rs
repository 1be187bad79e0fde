use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::client_hub::ClientHub;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// Context handed to every module phase.
#[derive(Clone)]
pub struct ModuleCtx {
    db: Option<DatabaseConnection>,
    config_provider: Option<Arc<dyn ConfigProvider>>,
    client_hub: Arc<ClientHub>,
    cancellation_token: CancellationToken,
    module_name: Option<Arc<str>>,
    home_dir: Option<Arc<PathBuf>>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: ModuleCtx {
                db: None,
                config_provider: None,
                client_hub: Arc::new(ClientHub::default()),
                cancellation_token: token,
                module_name: None,
                home_dir: None,
            },
        }
    }

    pub fn with_db(mut self, db: DatabaseConnection) -> Self {
        self.inner.db = Some(db);
        self
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn with_client_hub(mut self, hub: Arc<ClientHub>) -> Self {
        self.inner.client_hub = hub;
        self
    }

    /// Base directory for module files with relative paths (uploads, ...).
    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.inner.home_dir = Some(Arc::new(dir.into()));
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope the context to one module (done by the registry before each call).
    pub fn for_module(&self, name: &str) -> Self {
        let mut scoped = self.clone();
        scoped.module_name = Some(Arc::<str>::from(name));
        scoped
    }

    /// Cheap clone of the pooled connection, if the runtime has one.
    pub fn db(&self) -> Option<DatabaseConnection> {
        self.db.clone()
    }

    pub fn db_required(&self) -> anyhow::Result<DatabaseConnection> {
        self.db
            .clone()
            .ok_or_else(|| anyhow::anyhow!("database is required by {:?}", self.module_name))
    }

    pub fn client_hub(&self) -> Arc<ClientHub> {
        self.client_hub.clone()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Resolve a configured path: absolute paths are kept, relative ones are
    /// joined to the home dir (or used as-is when there is none).
    pub fn resolve_path(&self, configured: &str) -> PathBuf {
        let p = Path::new(configured);
        match &self.home_dir {
            Some(home) if p.is_relative() => home.join(p),
            _ => p.to_path_buf(),
        }
    }

    /// Best-effort: missing or invalid section falls back to `T::default()`.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> T {
        match (&self.module_name, &self.config_provider) {
            (Some(name), Some(p)) => match p.get_module_config(name) {
                Some(v) => serde_json::from_value::<T>(v.clone()).unwrap_or_else(|e| {
                    tracing::warn!(module = %name, error = %e, "invalid module config, using defaults");
                    T::default()
                }),
                None => T::default(),
            },
            _ => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    struct MapProvider(HashMap<String, serde_json::Value>);

    impl ConfigProvider for MapProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.0.get(module_name)
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Cfg {
        size: u32,
    }

    impl Default for Cfg {
        fn default() -> Self {
            Self { size: 3 }
        }
    }

    fn ctx_with(values: &[(&str, serde_json::Value)]) -> ModuleCtx {
        let map = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(MapProvider(map)))
            .build()
    }

    #[test]
    fn module_config_reads_scoped_section() {
        let ctx = ctx_with(&[("plants", serde_json::json!({ "size": 9 }))]);
        assert_eq!(ctx.for_module("plants").module_config::<Cfg>(), Cfg { size: 9 });
    }

    #[test]
    fn module_config_falls_back_to_default() {
        let ctx = ctx_with(&[("plants", serde_json::json!({ "size": "nope" }))]);
        assert_eq!(ctx.for_module("plants").module_config::<Cfg>(), Cfg::default());
        assert_eq!(ctx.for_module("other").module_config::<Cfg>(), Cfg::default());
        // unscoped context never reads config
        assert_eq!(ctx.module_config::<Cfg>(), Cfg::default());
    }

    #[test]
    fn relative_paths_resolve_against_home_dir() {
        let ctx = ModuleCtxBuilder::new(CancellationToken::new())
            .with_home_dir("/srv/plantcare")
            .build();
        assert_eq!(
            ctx.resolve_path("uploads"),
            PathBuf::from("/srv/plantcare/uploads")
        );
        assert_eq!(ctx.resolve_path("/data/up"), PathBuf::from("/data/up"));

        let bare = ModuleCtxBuilder::new(CancellationToken::new()).build();
        assert_eq!(bare.resolve_path("uploads"), PathBuf::from("uploads"));
    }

    #[test]
    fn db_required_errors_without_db() {
        let ctx = ctx_with(&[]).for_module("plants");
        assert!(ctx.db().is_none());
        assert!(ctx.db_required().is_err());
        assert_eq!(ctx.current_module(), Some("plants"));
    }
}
