use std::sync::Arc;

use appkit::{DbModule, Module, ModuleCtx, RestfulModule};
use async_trait::async_trait;
use chrono::Duration;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::AccountsConfig;
use crate::contract::client::{AccountsApi, PlantCounter};
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::AccountsLocalClient;
use crate::infra::storage::{SeaOrmSessionsRepository, SeaOrmUsersRepository};

pub const MODULE_NAME: &str = "accounts";

/// Users, sessions and profiles.
///
/// Publishes `dyn AccountsApi`. Picks up an optional `dyn PlantCounter`
/// from the hub when routes are registered, so it must be registered
/// before modules that depend on it.
#[derive(Default)]
pub struct Accounts {
    service: arc_swap::ArcSwapOption<Service>,
}

impl Accounts {
    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.load_full()
    }
}

#[async_trait]
impl Module for Accounts {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing accounts module");

        let cfg: AccountsConfig = ctx.module_config();
        debug!(
            session_ttl_hours = cfg.session_ttl_hours,
            bcrypt_cost = cfg.bcrypt_cost,
            "Loaded accounts config"
        );

        let db = ctx.db_required()?;
        let service = Arc::new(Service::new(
            Arc::new(SeaOrmUsersRepository::new(db.clone())),
            Arc::new(SeaOrmSessionsRepository::new(db)),
            ServiceConfig {
                session_ttl: Duration::hours(i64::from(cfg.session_ttl_hours.max(1))),
                bcrypt_cost: cfg.bcrypt_cost,
                max_username_length: cfg.max_username_length,
                max_description_length: cfg.max_description_length,
            },
        ));

        let api: Arc<dyn AccountsApi> = Arc::new(AccountsLocalClient::new(service.clone()));
        ctx.client_hub().register::<dyn AccountsApi>(api);
        info!("Accounts API exposed to ClientHub");

        self.service.store(Some(service));
        Ok(())
    }
}

#[async_trait]
impl DbModule for Accounts {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running accounts database migrations");
        crate::infra::storage::migrations::Migrator::up(db, None).await?;
        Ok(())
    }
}

impl RestfulModule for Accounts {
    fn register_rest(&self, ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering accounts REST routes");
        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let hub = ctx.client_hub();
        let accounts = hub
            .get::<dyn AccountsApi>()
            .map_err(|e| anyhow::anyhow!("accounts API missing from hub: {e}"))?;

        // every module has run init by now
        let service = match hub.get::<dyn PlantCounter>() {
            Ok(counter) => {
                debug!("Profiles will include plant counts");
                Arc::new(Service::clone(&service).with_plant_counter(counter))
            }
            Err(_) => service,
        };

        routes::register_routes(router, service, accounts)
    }
}
