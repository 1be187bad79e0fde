use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let text = |c: CatalogPlants| ColumnDef::new(c).text().not_null().default("").to_owned();

        manager
            .create_table(
                Table::create()
                    .table(CatalogPlants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogPlants::PlantId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(text(CatalogPlants::BotanicalName))
                    .col(text(CatalogPlants::CommonName))
                    .col(text(CatalogPlants::PlantType))
                    .col(text(CatalogPlants::WaterNeeds))
                    .col(
                        ColumnDef::new(CatalogPlants::MinWaterConsumption)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CatalogPlants::MaxWaterConsumption)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(text(CatalogPlants::ClimateZones))
                    .col(text(CatalogPlants::LightNeeds))
                    .col(text(CatalogPlants::SoilType))
                    .col(text(CatalogPlants::Maintenance))
                    .col(text(CatalogPlants::FlowerColor))
                    .col(text(CatalogPlants::FoliageColor))
                    .col(text(CatalogPlants::Perfume))
                    .col(text(CatalogPlants::Aromatic))
                    .col(text(CatalogPlants::Edible))
                    .col(text(CatalogPlants::BoreWaterTolerance))
                    .col(text(CatalogPlants::FrostTolerance))
                    .col(text(CatalogPlants::ImageLocation))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_catalog_plants_botanical_name")
                    .table(CatalogPlants::Table)
                    .col(CatalogPlants::BotanicalName)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserPlants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserPlants::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserPlants::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserPlants::PlantId).integer().not_null())
                    .col(ColumnDef::new(UserPlants::Size).double())
                    .col(ColumnDef::new(UserPlants::SunExposure).text())
                    .col(ColumnDef::new(UserPlants::PotDiameterCm).double())
                    .col(ColumnDef::new(UserPlants::LastWatered).date())
                    .col(ColumnDef::new(UserPlants::WateredAmountL).double())
                    .col(ColumnDef::new(UserPlants::ImagePath).text())
                    .col(ColumnDef::new(UserPlants::Position).text())
                    .col(
                        ColumnDef::new(UserPlants::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_plants_catalog")
                            .from(UserPlants::Table, UserPlants::PlantId)
                            .to(CatalogPlants::Table, CatalogPlants::PlantId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_plants_user_registered")
                    .table(UserPlants::Table)
                    .col(UserPlants::UserId)
                    .col(UserPlants::RegisteredAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserPlants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CatalogPlants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum CatalogPlants {
    Table,
    PlantId,
    BotanicalName,
    CommonName,
    PlantType,
    WaterNeeds,
    MinWaterConsumption,
    MaxWaterConsumption,
    ClimateZones,
    LightNeeds,
    SoilType,
    Maintenance,
    FlowerColor,
    FoliageColor,
    Perfume,
    Aromatic,
    Edible,
    BoreWaterTolerance,
    FrostTolerance,
    ImageLocation,
}

#[derive(DeriveIden)]
enum UserPlants {
    Table,
    Id,
    UserId,
    PlantId,
    Size,
    SunExposure,
    PotDiameterCm,
    LastWatered,
    WateredAmountL,
    ImagePath,
    Position,
    RegisteredAt,
}
