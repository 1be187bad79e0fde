use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use accounts::contract::client::PlantCounter;

use crate::contract::{client::PlantCareApi, error::PlantCareError, model::CatalogPlant};
use crate::domain::schedule::WateringReport;
use crate::domain::service::Service;

/// In-process client delegating to the domain service.
pub struct PlantCareLocalClient {
    service: Arc<Service>,
}

impl PlantCareLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PlantCareApi for PlantCareLocalClient {
    async fn get_catalog_plant(&self, plant_id: i32) -> Result<CatalogPlant, PlantCareError> {
        self.service
            .get_catalog_plant(plant_id)
            .await
            .map_err(Into::into)
    }

    async fn plant_count(&self, user_id: Uuid) -> Result<u64, PlantCareError> {
        self.service.plant_count(user_id).await.map_err(Into::into)
    }

    async fn watering_report(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<WateringReport, PlantCareError> {
        self.service
            .watering_report(user_id, today)
            .await
            .map_err(Into::into)
    }
}

/// Feeds the plant count shown on account profiles.
#[async_trait]
impl PlantCounter for PlantCareLocalClient {
    async fn plant_count(&self, user_id: Uuid) -> anyhow::Result<u64> {
        Ok(self.service.plant_count(user_id).await?)
    }
}
