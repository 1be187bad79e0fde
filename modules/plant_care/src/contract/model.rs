use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only catalog entry, imported from the waterwise CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogPlant {
    pub plant_id: i32,
    pub botanical_name: String,
    pub common_name: String,
    pub plant_type: String,
    pub water_needs: String,
    /// Annual water depth range for the plant's climate zones, in mm/year.
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

/// A catalog plant in a user's collection.
///
/// `sun_exposure` is kept as stored text; writes are validated against
/// [`SunExposure`](crate::domain::schedule::SunExposure) and the scheduler
/// parses it again on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPlant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plant_id: i32,
    pub size: Option<f64>,
    pub sun_exposure: Option<String>,
    pub pot_diameter_cm: Option<f64>,
    pub last_watered: Option<NaiveDate>,
    pub watered_amount_l: Option<f64>,
    pub image_path: Option<String>,
    pub position: Option<String>,
    pub nickname: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Data for adding a catalog plant to the caller's collection.
#[derive(Debug, Clone, Default)]
pub struct NewUserPlant {
    pub plant_id: i32,
    pub size: Option<f64>,
    pub sun_exposure: Option<String>,
    pub pot_diameter_cm: Option<f64>,
    pub last_watered: Option<NaiveDate>,
    pub watered_amount_l: Option<f64>,
    pub position: Option<String>,
    pub nickname: Option<String>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPlantPatch {
    pub size: Option<f64>,
    pub sun_exposure: Option<String>,
    pub pot_diameter_cm: Option<f64>,
    pub last_watered: Option<NaiveDate>,
    pub watered_amount_l: Option<f64>,
    pub position: Option<String>,
    pub nickname: Option<String>,
}

/// A user plant joined with its catalog entry; the scheduler's input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareRecord {
    pub plant: UserPlant,
    pub catalog: CatalogPlant,
}

impl CareRecord {
    pub fn id(&self) -> Uuid {
        self.plant.id
    }

    pub fn plant_name(&self) -> &str {
        &self.catalog.common_name
    }
}

/// Result of a catalog CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// Result of an image-location refresh; unknown botanical names are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub updated: usize,
    pub skipped: Vec<String>,
}
