use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Catalog plant not found: {plant_id}")]
    CatalogPlantNotFound { plant_id: i32 },

    #[error("Plant not found: {id}")]
    PlantNotFound { id: Uuid },

    #[error("Plant {id} belongs to another user")]
    Forbidden { id: Uuid },

    #[error("Plant {id} has no photo")]
    PhotoNotFound { id: Uuid },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Unsupported file type '{extension}'")]
    UnsupportedFileType { extension: String },

    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Import failed: {message}")]
    Import { message: String },

    #[error("Photo storage error: {message}")]
    Storage { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn catalog_plant_not_found(plant_id: i32) -> Self {
        Self::CatalogPlantNotFound { plant_id }
    }

    pub fn plant_not_found(id: Uuid) -> Self {
        Self::PlantNotFound { id }
    }

    pub fn forbidden(id: Uuid) -> Self {
        Self::Forbidden { id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn import(message: impl Into<String>) -> Self {
        Self::Import {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
