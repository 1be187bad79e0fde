use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{CareRecord, CatalogPlant, UserPlant};

/// Persistence port for the read-only plant catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find(&self, plant_id: i32) -> anyhow::Result<Option<CatalogPlant>>;
    /// Case-insensitive substring match on the common name, ordered by name.
    async fn search_by_common_name(
        &self,
        fragment: &str,
        limit: u64,
    ) -> anyhow::Result<Vec<CatalogPlant>>;
    /// Insert or replace by `plant_id`. Returns true when the row was new.
    async fn upsert(&self, plant: CatalogPlant) -> anyhow::Result<bool>;
    /// Returns false when no plant has that botanical name.
    async fn set_image_location(
        &self,
        botanical_name: &str,
        image_location: &str,
    ) -> anyhow::Result<bool>;
}

/// Persistence port for users' plant collections.
#[async_trait]
pub trait UserPlantsRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserPlant>>;
    /// The joined record for one plant, if both rows exist.
    async fn find_record(&self, id: Uuid) -> anyhow::Result<Option<CareRecord>>;
    /// All of a user's plants joined with the catalog, newest registration first.
    async fn list_records(&self, user_id: Uuid) -> anyhow::Result<Vec<CareRecord>>;
    async fn count_for_user(&self, user_id: Uuid) -> anyhow::Result<u64>;
    async fn insert(&self, plant: UserPlant) -> anyhow::Result<()>;
    async fn update(&self, plant: UserPlant) -> anyhow::Result<()>;
    /// Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
