use std::sync::Arc;

use accounts::contract::client::{AccountsApi, PlantCounter};
use appkit::{DbModule, Module, ModuleCtx, RestfulModule};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::{handlers::ListingSettings, routes};
use crate::config::PlantCareConfig;
use crate::contract::client::PlantCareApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::PlantCareLocalClient;
use crate::infra::photos::FsPhotoStore;
use crate::infra::storage::{SeaOrmCatalogRepository, SeaOrmUserPlantsRepository};

pub const MODULE_NAME: &str = "plant_care";

struct Wired {
    service: Arc<Service>,
    listing: ListingSettings,
}

/// Catalog, plant collections and watering schedules.
///
/// Consumes `dyn AccountsApi` for request authentication, so the accounts
/// module must be registered first. Publishes `dyn PlantCareApi` and
/// `dyn PlantCounter`.
#[derive(Default)]
pub struct PlantCare {
    wired: arc_swap::ArcSwapOption<Wired>,
}

impl PlantCare {
    pub fn service(&self) -> Option<Arc<Service>> {
        self.wired.load().as_ref().map(|w| w.service.clone())
    }
}

#[async_trait]
impl Module for PlantCare {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing plant_care module");

        let cfg: PlantCareConfig = ctx.module_config();
        let upload_dir = ctx.resolve_path(&cfg.upload_dir);
        debug!(
            plants_per_page = cfg.plants_per_page,
            upload_dir = %upload_dir.display(),
            "Loaded plant_care config"
        );

        let db = ctx.db_required()?;
        let service = Arc::new(Service::new(
            Arc::new(SeaOrmCatalogRepository::new(db.clone())),
            Arc::new(SeaOrmUserPlantsRepository::new(db)),
            Arc::new(FsPhotoStore::new(upload_dir)),
            ServiceConfig {
                max_label_length: cfg.max_label_length,
                allowed_extensions: cfg
                    .allowed_extensions
                    .iter()
                    .map(|e| e.to_ascii_lowercase())
                    .collect(),
                max_upload_bytes: cfg.max_upload_bytes,
                catalog_search_limit: cfg.catalog_search_limit,
            },
        ));

        let client = Arc::new(PlantCareLocalClient::new(service.clone()));
        let hub = ctx.client_hub();
        hub.register::<dyn PlantCareApi>(client.clone());
        hub.register::<dyn PlantCounter>(client);
        info!("PlantCare API exposed to ClientHub");

        self.wired.store(Some(Arc::new(Wired {
            service,
            listing: ListingSettings {
                plants_per_page: cfg.plants_per_page.max(1),
            },
        })));
        Ok(())
    }
}

#[async_trait]
impl DbModule for PlantCare {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running plant_care database migrations");
        crate::infra::storage::migrations::Migrator::up(db, None).await?;
        Ok(())
    }
}

impl RestfulModule for PlantCare {
    fn register_rest(&self, ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering plant_care REST routes");
        let wired = self
            .wired
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let accounts = ctx
            .client_hub()
            .get::<dyn AccountsApi>()
            .map_err(|e| anyhow::anyhow!("plant_care needs the accounts module: {e}"))?;

        routes::register_routes(router, wired.service.clone(), accounts, wired.listing)
    }
}
