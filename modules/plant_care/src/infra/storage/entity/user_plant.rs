use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_plants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owner; users live in the accounts module, so there is no FK.
    pub user_id: Uuid,
    pub plant_id: i32,
    pub size: Option<f64>,
    pub sun_exposure: Option<String>,
    pub pot_diameter_cm: Option<f64>,
    pub last_watered: Option<Date>,
    pub watered_amount_l: Option<f64>,
    pub image_path: Option<String>,
    pub position: Option<String>,
    pub nickname: Option<String>,
    pub registered_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::catalog_plant::Entity",
        from = "Column::PlantId",
        to = "super::catalog_plant::Column::PlantId"
    )]
    CatalogPlant,
}

impl Related<super::catalog_plant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogPlant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
