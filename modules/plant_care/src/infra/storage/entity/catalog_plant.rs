use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "catalog_plants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub plant_id: i32,
    pub botanical_name: String,
    pub common_name: String,
    pub plant_type: String,
    pub water_needs: String,
    pub min_water_consumption: i32,
    pub max_water_consumption: i32,
    pub climate_zones: String,
    pub light_needs: String,
    pub soil_type: String,
    pub maintenance: String,
    pub flower_color: String,
    pub foliage_color: String,
    pub perfume: String,
    pub aromatic: String,
    pub edible: String,
    pub bore_water_tolerance: String,
    pub frost_tolerance: String,
    pub image_location: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_plant::Entity")]
    UserPlant,
}

impl Related<super::user_plant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPlant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
