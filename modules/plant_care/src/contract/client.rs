use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::contract::error::PlantCareError;
use crate::contract::model::CatalogPlant;
use crate::domain::schedule::WateringReport;

/// Public API of the plant_care module for in-process consumers.
#[async_trait]
pub trait PlantCareApi: Send + Sync {
    async fn get_catalog_plant(&self, plant_id: i32) -> Result<CatalogPlant, PlantCareError>;

    async fn plant_count(&self, user_id: Uuid) -> Result<u64, PlantCareError>;

    /// Schedules and overdue notifications for the user's plants as of `today`.
    async fn watering_report(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<WateringReport, PlantCareError>;
}
