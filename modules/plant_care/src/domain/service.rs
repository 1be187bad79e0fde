use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{CareRecord, CatalogPlant, NewUserPlant, UserPlant, UserPlantPatch};
use crate::domain::error::DomainError;
use crate::domain::ports::PhotoStore;
use crate::domain::repo::{CatalogRepository, UserPlantsRepository};
use crate::domain::schedule::{self, SunExposure, WateringReport};

/// Domain service for the catalog and users' plant collections.
/// The acting user is always passed in explicitly.
#[derive(Clone)]
pub struct Service {
    catalog: Arc<dyn CatalogRepository>,
    plants: Arc<dyn UserPlantsRepository>,
    photos: Arc<dyn PhotoStore>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_label_length: usize,
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
    pub catalog_search_limit: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_label_length: 100,
            allowed_extensions: ["png", "jpg", "jpeg", "gif"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_upload_bytes: 16 * 1024 * 1024,
            catalog_search_limit: 50,
        }
    }
}

fn db_err(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

impl Service {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        plants: Arc<dyn UserPlantsRepository>,
        photos: Arc<dyn PhotoStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            catalog,
            plants,
            photos,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(name = "plant_care.service.search_catalog", skip(self))]
    pub async fn search_catalog(
        &self,
        name: &str,
        limit: Option<u64>,
    ) -> Result<Vec<CatalogPlant>, DomainError> {
        let max = self.config.catalog_search_limit;
        let limit = limit.unwrap_or(max).clamp(1, max.max(1));
        let found = self
            .catalog
            .search_by_common_name(name.trim(), limit)
            .await
            .map_err(db_err)?;
        debug!(count = found.len(), "catalog search done");
        Ok(found)
    }

    #[instrument(name = "plant_care.service.get_catalog_plant", skip(self))]
    pub async fn get_catalog_plant(&self, plant_id: i32) -> Result<CatalogPlant, DomainError> {
        self.catalog
            .find(plant_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::catalog_plant_not_found(plant_id))
    }

    #[instrument(
        name = "plant_care.service.add_plant",
        skip(self, new),
        fields(user_id = %user_id, plant_id = new.plant_id)
    )]
    pub async fn add_plant(
        &self,
        user_id: Uuid,
        new: NewUserPlant,
    ) -> Result<CareRecord, DomainError> {
        info!("Adding plant to collection");

        let catalog = self.get_catalog_plant(new.plant_id).await?;

        let plant = UserPlant {
            id: Uuid::new_v4(),
            user_id,
            plant_id: catalog.plant_id,
            size: positive("size", new.size)?,
            sun_exposure: normalize_sun(new.sun_exposure)?,
            pot_diameter_cm: positive("pot_diameter_cm", new.pot_diameter_cm)?,
            last_watered: new.last_watered,
            watered_amount_l: non_negative("watered_amount_l", new.watered_amount_l)?,
            image_path: None,
            position: self.label("position", new.position)?,
            nickname: self.label("nickname", new.nickname)?,
            registered_at: Utc::now(),
        };

        self.plants.insert(plant.clone()).await.map_err(db_err)?;
        info!(id = %plant.id, "Plant added");
        Ok(CareRecord { plant, catalog })
    }

    #[instrument(name = "plant_care.service.list_plants", skip(self), fields(user_id = %user_id))]
    pub async fn list_plants(&self, user_id: Uuid) -> Result<Vec<CareRecord>, DomainError> {
        let records = self.plants.list_records(user_id).await.map_err(db_err)?;
        debug!(count = records.len(), "listed plants");
        Ok(records)
    }

    #[instrument(name = "plant_care.service.get_plant", skip(self), fields(user_id = %user_id, id = %id))]
    pub async fn get_plant(&self, user_id: Uuid, id: Uuid) -> Result<CareRecord, DomainError> {
        self.owned(user_id, id).await?;
        self.record(id).await
    }

    #[instrument(
        name = "plant_care.service.update_plant",
        skip(self, patch),
        fields(user_id = %user_id, id = %id)
    )]
    pub async fn update_plant(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: UserPlantPatch,
    ) -> Result<CareRecord, DomainError> {
        info!("Updating plant");
        let mut plant = self.owned(user_id, id).await?;

        if let Some(v) = patch.size {
            plant.size = positive("size", Some(v))?;
        }
        if let Some(v) = patch.sun_exposure {
            plant.sun_exposure = normalize_sun(Some(v))?;
        }
        if let Some(v) = patch.pot_diameter_cm {
            plant.pot_diameter_cm = positive("pot_diameter_cm", Some(v))?;
        }
        if let Some(v) = patch.last_watered {
            plant.last_watered = Some(v);
        }
        if let Some(v) = patch.watered_amount_l {
            plant.watered_amount_l = non_negative("watered_amount_l", Some(v))?;
        }
        if let Some(v) = patch.position {
            plant.position = self.label("position", Some(v))?;
        }
        if let Some(v) = patch.nickname {
            plant.nickname = self.label("nickname", Some(v))?;
        }

        self.plants.update(plant).await.map_err(db_err)?;
        self.record(id).await
    }

    #[instrument(name = "plant_care.service.delete_plant", skip(self), fields(user_id = %user_id, id = %id))]
    pub async fn delete_plant(&self, user_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting plant");
        let plant = self.owned(user_id, id).await?;

        if !self.plants.delete(id).await.map_err(db_err)? {
            return Err(DomainError::plant_not_found(id));
        }
        if let Some(key) = plant.image_path {
            if let Err(e) = self.photos.remove(&key).await {
                warn!(error = %e, key = %key, "failed to remove photo of deleted plant");
            }
        }
        Ok(())
    }

    #[instrument(
        name = "plant_care.service.attach_photo",
        skip(self, bytes),
        fields(user_id = %user_id, id = %id, size = bytes.len())
    )]
    pub async fn attach_photo(
        &self,
        user_id: Uuid,
        id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<CareRecord, DomainError> {
        let mut plant = self.owned(user_id, id).await?;
        let extension = self.photo_extension(filename)?;
        if bytes.is_empty() {
            return Err(DomainError::validation("photo", "file is empty"));
        }
        if bytes.len() > self.config.max_upload_bytes {
            return Err(DomainError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.config.max_upload_bytes,
            });
        }

        let key = self
            .photos
            .save(&extension, bytes)
            .await
            .map_err(|e| DomainError::storage(format!("{e:#}")))?;
        let previous = plant.image_path.replace(key.clone());

        if let Err(e) = self.plants.update(plant).await {
            if let Err(rm) = self.photos.remove(&key).await {
                warn!(error = %rm, key = %key, "failed to remove orphaned photo");
            }
            return Err(db_err(e));
        }
        if let Some(old) = previous {
            if let Err(e) = self.photos.remove(&old).await {
                warn!(error = %e, key = %old, "failed to remove replaced photo");
            }
        }
        info!(key = %key, "Photo attached");
        self.record(id).await
    }

    /// Photo bytes with the stored key (the key carries the file extension).
    #[instrument(name = "plant_care.service.get_photo", skip(self), fields(user_id = %user_id, id = %id))]
    pub async fn get_photo(&self, user_id: Uuid, id: Uuid) -> Result<(String, Vec<u8>), DomainError> {
        let plant = self.owned(user_id, id).await?;
        let key = plant.image_path.ok_or(DomainError::PhotoNotFound { id })?;
        let bytes = self
            .photos
            .load(&key)
            .await
            .map_err(|e| DomainError::storage(format!("{e:#}")))?;
        Ok((key, bytes))
    }

    #[instrument(name = "plant_care.service.watering_report", skip(self), fields(user_id = %user_id, today = %today))]
    pub async fn watering_report(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<WateringReport, DomainError> {
        let records = self.list_plants(user_id).await?;
        let report = schedule::build_schedule_and_notifications(records, today);
        let failed = report.records.iter().filter(|r| r.schedule.is_err()).count();
        if failed > 0 {
            debug!(failed, "some plants have no schedule");
        }
        Ok(report)
    }

    pub async fn plant_count(&self, user_id: Uuid) -> Result<u64, DomainError> {
        self.plants.count_for_user(user_id).await.map_err(db_err)
    }

    async fn owned(&self, user_id: Uuid, id: Uuid) -> Result<UserPlant, DomainError> {
        let plant = self
            .plants
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::plant_not_found(id))?;
        if plant.user_id != user_id {
            return Err(DomainError::forbidden(id));
        }
        Ok(plant)
    }

    async fn record(&self, id: Uuid) -> Result<CareRecord, DomainError> {
        self.plants
            .find_record(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::plant_not_found(id))
    }

    fn label(&self, field: &str, value: Option<String>) -> Result<Option<String>, DomainError> {
        let Some(v) = value.map(|v| v.trim().to_string()) else {
            return Ok(None);
        };
        if v.is_empty() {
            return Ok(None);
        }
        let len = v.chars().count();
        if len > self.config.max_label_length {
            return Err(DomainError::validation(
                field,
                format!(
                    "too long: {len} characters (max: {})",
                    self.config.max_label_length
                ),
            ));
        }
        Ok(Some(v))
    }

    fn photo_extension(&self, filename: &str) -> Result<String, DomainError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| DomainError::validation("photo", "file name has no extension"))?;
        if self.config.allowed_extensions.iter().any(|a| *a == ext) {
            Ok(ext)
        } else {
            Err(DomainError::UnsupportedFileType { extension: ext })
        }
    }
}

fn positive(field: &str, value: Option<f64>) -> Result<Option<f64>, DomainError> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(DomainError::validation(
            field,
            format!("must be a positive number, got {v}"),
        )),
        other => Ok(other),
    }
}

fn non_negative(field: &str, value: Option<f64>) -> Result<Option<f64>, DomainError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(DomainError::validation(
            field,
            format!("must be a non-negative number, got {v}"),
        )),
        other => Ok(other),
    }
}

fn normalize_sun(value: Option<String>) -> Result<Option<String>, DomainError> {
    value
        .map(|v| {
            v.parse::<SunExposure>()
                .map(|s| s.as_str().to_string())
                .map_err(|e| DomainError::validation("sun_exposure", e.to_string()))
        })
        .transpose()
}
