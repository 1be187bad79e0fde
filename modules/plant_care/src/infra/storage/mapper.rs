use sea_orm::Set;

use crate::contract::model::{CareRecord, CatalogPlant, UserPlant};
use crate::infra::storage::entity::{catalog_plant, user_plant};

pub fn catalog_to_contract(m: catalog_plant::Model) -> CatalogPlant {
    CatalogPlant {
        plant_id: m.plant_id,
        botanical_name: m.botanical_name,
        common_name: m.common_name,
        plant_type: m.plant_type,
        water_needs: m.water_needs,
        min_water_consumption: m.min_water_consumption,
        max_water_consumption: m.max_water_consumption,
        climate_zones: m.climate_zones,
        light_needs: m.light_needs,
        soil_type: m.soil_type,
        maintenance: m.maintenance,
        flower_color: m.flower_color,
        foliage_color: m.foliage_color,
        perfume: m.perfume,
        aromatic: m.aromatic,
        edible: m.edible,
        bore_water_tolerance: m.bore_water_tolerance,
        frost_tolerance: m.frost_tolerance,
        image_location: m.image_location,
    }
}

pub fn catalog_to_active(p: CatalogPlant) -> catalog_plant::ActiveModel {
    catalog_plant::ActiveModel {
        plant_id: Set(p.plant_id),
        botanical_name: Set(p.botanical_name),
        common_name: Set(p.common_name),
        plant_type: Set(p.plant_type),
        water_needs: Set(p.water_needs),
        min_water_consumption: Set(p.min_water_consumption),
        max_water_consumption: Set(p.max_water_consumption),
        climate_zones: Set(p.climate_zones),
        light_needs: Set(p.light_needs),
        soil_type: Set(p.soil_type),
        maintenance: Set(p.maintenance),
        flower_color: Set(p.flower_color),
        foliage_color: Set(p.foliage_color),
        perfume: Set(p.perfume),
        aromatic: Set(p.aromatic),
        edible: Set(p.edible),
        bore_water_tolerance: Set(p.bore_water_tolerance),
        frost_tolerance: Set(p.frost_tolerance),
        image_location: Set(p.image_location),
    }
}

pub fn plant_to_contract(m: user_plant::Model) -> UserPlant {
    UserPlant {
        id: m.id,
        user_id: m.user_id,
        plant_id: m.plant_id,
        size: m.size,
        sun_exposure: m.sun_exposure,
        pot_diameter_cm: m.pot_diameter_cm,
        last_watered: m.last_watered,
        watered_amount_l: m.watered_amount_l,
        image_path: m.image_path,
        position: m.position,
        nickname: m.nickname,
        registered_at: m.registered_at,
    }
}

pub fn plant_to_active(p: UserPlant) -> user_plant::ActiveModel {
    user_plant::ActiveModel {
        id: Set(p.id),
        user_id: Set(p.user_id),
        plant_id: Set(p.plant_id),
        size: Set(p.size),
        sun_exposure: Set(p.sun_exposure),
        pot_diameter_cm: Set(p.pot_diameter_cm),
        last_watered: Set(p.last_watered),
        watered_amount_l: Set(p.watered_amount_l),
        image_path: Set(p.image_path),
        position: Set(p.position),
        nickname: Set(p.nickname),
        registered_at: Set(p.registered_at),
    }
}

/// Join rows whose catalog side is missing are dropped.
pub fn record_from_join(
    (plant, catalog): (user_plant::Model, Option<catalog_plant::Model>),
) -> Option<CareRecord> {
    Some(CareRecord {
        plant: plant_to_contract(plant),
        catalog: catalog_to_contract(catalog?),
    })
}
