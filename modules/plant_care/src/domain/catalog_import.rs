use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::contract::model::{CatalogPlant, ImportSummary, RefreshSummary};
use crate::domain::error::DomainError;
use crate::domain::repo::CatalogRepository;

/// Bulk catalog maintenance used by the command line tools.
#[derive(Clone)]
pub struct CatalogImporter {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogImporter {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Insert new plants and overwrite existing ones with the same `plant_id`.
    #[instrument(name = "plant_care.import.import_catalog", skip_all, fields(rows = plants.len()))]
    pub async fn import_catalog(
        &self,
        plants: Vec<CatalogPlant>,
    ) -> Result<ImportSummary, DomainError> {
        let mut summary = ImportSummary::default();
        for plant in plants {
            let inserted = self
                .catalog
                .upsert(plant)
                .await
                .map_err(|e| DomainError::database(format!("{e:#}")))?;
            if inserted {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
        }
        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            "Catalog imported"
        );
        Ok(summary)
    }

    /// `rows` are `(botanical_name, image_location)` pairs; unknown names are skipped.
    #[instrument(name = "plant_care.import.refresh_catalog_images", skip_all, fields(rows = rows.len()))]
    pub async fn refresh_catalog_images(
        &self,
        rows: Vec<(String, String)>,
    ) -> Result<RefreshSummary, DomainError> {
        let mut summary = RefreshSummary::default();
        for (botanical_name, image_location) in rows {
            let updated = self
                .catalog
                .set_image_location(&botanical_name, &image_location)
                .await
                .map_err(|e| DomainError::database(format!("{e:#}")))?;
            if updated {
                summary.updated += 1;
            } else {
                warn!(botanical_name = %botanical_name, "Plant not found, skipping");
                summary.skipped.push(botanical_name);
            }
        }
        info!(
            updated = summary.updated,
            skipped = summary.skipped.len(),
            "Catalog images refreshed"
        );
        Ok(summary)
    }
}
