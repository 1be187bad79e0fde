//! SeaORM-backed implementations of the plant_care repository ports.
//!
//! Generic over `C: ConnectionTrait` so a transaction can be used as well as
//! the pooled connection.

use anyhow::Context;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::warn;
use uuid::Uuid;

use crate::contract::model::{CareRecord, CatalogPlant, UserPlant};
use crate::domain::repo::{CatalogRepository, UserPlantsRepository};
use crate::infra::storage::entity::{catalog_plant, user_plant};
use crate::infra::storage::mapper;

/// A user plant whose catalog row is gone is dropped from joined reads.
fn joined(row: (user_plant::Model, Option<catalog_plant::Model>)) -> Option<CareRecord> {
    let (id, plant_id) = (row.0.id, row.0.plant_id);
    let record = mapper::record_from_join(row);
    if record.is_none() {
        warn!(%id, plant_id, "user plant references a missing catalog entry, skipping");
    }
    record
}

pub struct SeaOrmCatalogRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCatalogRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}

#[async_trait::async_trait]
impl<C> CatalogRepository for SeaOrmCatalogRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find(&self, plant_id: i32) -> anyhow::Result<Option<CatalogPlant>> {
        let found = catalog_plant::Entity::find_by_id(plant_id)
            .one(&self.conn)
            .await
            .context("catalog find failed")?;
        Ok(found.map(mapper::catalog_to_contract))
    }

    async fn search_by_common_name(
        &self,
        fragment: &str,
        limit: u64,
    ) -> anyhow::Result<Vec<CatalogPlant>> {
        // SQLite LIKE is case-insensitive for ASCII.
        let rows = catalog_plant::Entity::find()
            .filter(catalog_plant::Column::CommonName.contains(fragment))
            .order_by_asc(catalog_plant::Column::CommonName)
            .order_by_asc(catalog_plant::Column::PlantId)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("catalog search failed")?;
        Ok(rows.into_iter().map(mapper::catalog_to_contract).collect())
    }

    async fn upsert(&self, plant: CatalogPlant) -> anyhow::Result<bool> {
        let existed = catalog_plant::Entity::find_by_id(plant.plant_id)
            .count(&self.conn)
            .await
            .context("catalog upsert lookup failed")?
            > 0;

        let columns = [
            catalog_plant::Column::BotanicalName,
            catalog_plant::Column::CommonName,
            catalog_plant::Column::PlantType,
            catalog_plant::Column::WaterNeeds,
            catalog_plant::Column::MinWaterConsumption,
            catalog_plant::Column::MaxWaterConsumption,
            catalog_plant::Column::ClimateZones,
            catalog_plant::Column::LightNeeds,
            catalog_plant::Column::SoilType,
            catalog_plant::Column::Maintenance,
            catalog_plant::Column::FlowerColor,
            catalog_plant::Column::FoliageColor,
            catalog_plant::Column::Perfume,
            catalog_plant::Column::Aromatic,
            catalog_plant::Column::Edible,
            catalog_plant::Column::BoreWaterTolerance,
            catalog_plant::Column::FrostTolerance,
            catalog_plant::Column::ImageLocation,
        ];

        catalog_plant::Entity::insert(mapper::catalog_to_active(plant))
            .on_conflict(
                OnConflict::column(catalog_plant::Column::PlantId)
                    .update_columns(columns)
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("catalog upsert failed")?;
        Ok(!existed)
    }

    async fn set_image_location(
        &self,
        botanical_name: &str,
        image_location: &str,
    ) -> anyhow::Result<bool> {
        let res = catalog_plant::Entity::update_many()
            .col_expr(
                catalog_plant::Column::ImageLocation,
                sea_orm::sea_query::Expr::value(image_location),
            )
            .filter(catalog_plant::Column::BotanicalName.eq(botanical_name))
            .exec(&self.conn)
            .await
            .context("catalog image update failed")?;
        Ok(res.rows_affected > 0)
    }
}

pub struct SeaOrmUserPlantsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUserPlantsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UserPlantsRepository for SeaOrmUserPlantsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserPlant>> {
        let found = user_plant::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(mapper::plant_to_contract))
    }

    async fn find_record(&self, id: Uuid) -> anyhow::Result<Option<CareRecord>> {
        let row = user_plant::Entity::find_by_id(id)
            .find_also_related(catalog_plant::Entity)
            .one(&self.conn)
            .await
            .context("find_record failed")?;
        Ok(row.and_then(joined))
    }

    async fn list_records(&self, user_id: Uuid) -> anyhow::Result<Vec<CareRecord>> {
        let rows = user_plant::Entity::find()
            .find_also_related(catalog_plant::Entity)
            .filter(user_plant::Column::UserId.eq(user_id))
            .order_by_desc(user_plant::Column::RegisteredAt)
            .order_by_asc(user_plant::Column::Id)
            .all(&self.conn)
            .await
            .context("list_records failed")?;
        Ok(rows.into_iter().filter_map(joined).collect())
    }

    async fn count_for_user(&self, user_id: Uuid) -> anyhow::Result<u64> {
        user_plant::Entity::find()
            .filter(user_plant::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("count_for_user failed")
    }

    async fn insert(&self, plant: UserPlant) -> anyhow::Result<()> {
        let _ = mapper::plant_to_active(plant)
            .insert(&self.conn)
            .await
            .context("insert failed")?;
        Ok(())
    }

    async fn update(&self, plant: UserPlant) -> anyhow::Result<()> {
        let mut m = mapper::plant_to_active(plant);
        // ownership and registration time never change
        m.user_id = sea_orm::ActiveValue::NotSet;
        m.registered_at = sea_orm::ActiveValue::NotSet;
        let _ = m.update(&self.conn).await.context("update failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = user_plant::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
