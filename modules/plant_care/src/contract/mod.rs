pub mod client;
pub mod error;
pub mod model;

pub use client::PlantCareApi;
pub use error::PlantCareError;
pub use model::{CareRecord, CatalogPlant, NewUserPlant, UserPlant, UserPlantPatch};
