//! Reader for the waterwise plants CSV export.
//!
//! Numeric columns may be written as floats (`"12.0"`); empty water bounds
//! read as 0. Unknown columns are ignored.

use serde::Deserialize;
use std::io::Read;

use crate::contract::model::CatalogPlant;
use crate::domain::error::DomainError;

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Plant ID")]
    plant_id: String,
    #[serde(rename = "Botanical Name")]
    botanical_name: String,
    #[serde(rename = "Common Name")]
    common_name: String,
    #[serde(rename = "Plant Type")]
    plant_type: String,
    #[serde(rename = "Water Needs")]
    water_needs: String,
    #[serde(default)]
    min_water_consumption: Option<String>,
    #[serde(default)]
    max_water_consumption: Option<String>,
    #[serde(rename = "Climate Zones")]
    climate_zones: String,
    #[serde(rename = "Light Needs")]
    light_needs: String,
    #[serde(rename = "Soil Type")]
    soil_type: String,
    #[serde(rename = "Maintenance")]
    maintenance: String,
    #[serde(rename = "Flower colour")]
    flower_color: String,
    #[serde(rename = "Foliage Colour")]
    foliage_color: String,
    #[serde(rename = "Perfume")]
    perfume: String,
    #[serde(rename = "Aromatic")]
    aromatic: String,
    #[serde(rename = "Edible")]
    edible: String,
    #[serde(rename = "Bore water Tolerance")]
    bore_water_tolerance: String,
    #[serde(rename = "Frost Tolerance")]
    frost_tolerance: String,
    #[serde(rename = "Image Location")]
    image_location: String,
}

#[derive(Debug, Deserialize)]
struct ImageRow {
    #[serde(rename = "Botanical Name")]
    botanical_name: String,
    #[serde(rename = "Image Location")]
    image_location: String,
}

/// Integer stored as text, possibly with a fractional part; truncated.
fn parse_int(field: &str, raw: &str) -> Result<i32, String> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{field}: '{raw}' is not a number"))?;
    if !v.is_finite() || v < f64::from(i32::MIN) || v > f64::from(i32::MAX) {
        return Err(format!("{field}: '{raw}' is out of range"));
    }
    Ok(v.trunc() as i32)
}

fn parse_bound(field: &str, raw: Option<&str>) -> Result<i32, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(s) => parse_int(field, s),
    }
}

impl CatalogRow {
    fn into_plant(self) -> Result<CatalogPlant, String> {
        Ok(CatalogPlant {
            plant_id: parse_int("Plant ID", &self.plant_id)?,
            min_water_consumption: parse_bound(
                "min_water_consumption",
                self.min_water_consumption.as_deref(),
            )?,
            max_water_consumption: parse_bound(
                "max_water_consumption",
                self.max_water_consumption.as_deref(),
            )?,
            botanical_name: self.botanical_name,
            common_name: self.common_name,
            plant_type: self.plant_type,
            water_needs: self.water_needs,
            climate_zones: self.climate_zones,
            light_needs: self.light_needs,
            soil_type: self.soil_type,
            maintenance: self.maintenance,
            flower_color: self.flower_color,
            foliage_color: self.foliage_color,
            perfume: self.perfume,
            aromatic: self.aromatic,
            edible: self.edible,
            bore_water_tolerance: self.bore_water_tolerance,
            frost_tolerance: self.frost_tolerance,
            image_location: self.image_location,
        })
    }
}

fn line_of(pos: Option<&csv::Position>) -> u64 {
    pos.map(csv::Position::line).unwrap_or(0)
}

pub fn parse_catalog<R: Read>(reader: R) -> Result<Vec<CatalogPlant>, DomainError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| DomainError::import(format!("reading header: {e}")))?
        .clone();

    let mut plants = Vec::new();
    for record in rdr.records() {
        let record = record
            .map_err(|e| DomainError::import(format!("line {}: {e}", line_of(e.position()))))?;
        let line = line_of(record.position());
        let plant = record
            .deserialize::<CatalogRow>(Some(&headers))
            .map_err(|e| e.to_string())
            .and_then(CatalogRow::into_plant)
            .map_err(|e| DomainError::import(format!("line {line}: {e}")))?;
        plants.push(plant);
    }
    Ok(plants)
}

/// `(botanical_name, image_location)` pairs in file order.
pub fn parse_image_locations<R: Read>(reader: R) -> Result<Vec<(String, String)>, DomainError> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<ImageRow>()
        .map(|row| {
            row.map(|r| (r.botanical_name, r.image_location))
                .map_err(|e| DomainError::import(format!("line {}: {e}", line_of(e.position()))))
        })
        .collect()
}
