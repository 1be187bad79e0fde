pub mod catalog_plant;
pub mod user_plant;
