use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone)]
pub enum PlantCareError {
    #[error("Catalog plant not found: {plant_id}")]
    CatalogPlantNotFound { plant_id: i32 },

    #[error("Plant not found: {id}")]
    NotFound { id: Uuid },

    #[error("Plant {id} belongs to another user")]
    Forbidden { id: Uuid },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl PlantCareError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for PlantCareError {
    fn from(e: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match e {
            CatalogPlantNotFound { plant_id } => Self::CatalogPlantNotFound { plant_id },
            PlantNotFound { id } | PhotoNotFound { id } => Self::NotFound { id },
            Forbidden { id } => Self::Forbidden { id },
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            UnsupportedFileType { .. } | PayloadTooLarge { .. } | Import { .. } => {
                Self::validation(e.to_string())
            }
            Storage { .. } | Database { .. } => Self::Internal,
        }
    }
}
