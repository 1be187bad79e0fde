use appkit::{Problem, ProblemResponse};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    ProblemResponse(
        Problem::new(status, title, detail)
            .with_type(format!("https://errors.plantcare.dev/{code}"))
            .with_code(code)
            .with_instance(instance),
    )
}

/// Map a domain error to an RFC 9457 response.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::CatalogPlantNotFound { plant_id } => from_parts(
            StatusCode::NOT_FOUND,
            "PLANTS_CATALOG_NOT_FOUND",
            "Catalog plant not found",
            format!("Plant id {plant_id} doesn't exist"),
            instance,
        ),
        DomainError::PlantNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "PLANTS_NOT_FOUND",
            "Plant not found",
            format!("Plant {id} was not found"),
            instance,
        ),
        DomainError::PhotoNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "PLANTS_PHOTO_NOT_FOUND",
            "Photo not found",
            format!("Plant {id} has no photo"),
            instance,
        ),
        DomainError::Forbidden { .. } => from_parts(
            StatusCode::FORBIDDEN,
            "PLANTS_FORBIDDEN",
            "Forbidden",
            "This plant belongs to another user",
            instance,
        ),
        DomainError::Validation { .. } | DomainError::Import { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "PLANTS_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        DomainError::UnsupportedFileType { .. } => from_parts(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "PLANTS_UNSUPPORTED_FILE_TYPE",
            "Unsupported file type",
            e.to_string(),
            instance,
        ),
        DomainError::PayloadTooLarge { .. } => from_parts(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PLANTS_PAYLOAD_TOO_LARGE",
            "Payload too large",
            e.to_string(),
            instance,
        ),
        DomainError::Storage { .. } | DomainError::Database { .. } => {
            tracing::error!(error = ?e, "internal error");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PLANTS_INTERNAL",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn ownership_errors_map_to_distinct_statuses() {
        let id = Uuid::new_v4();
        let nf = map_domain_error(&DomainError::plant_not_found(id), "/plants/x");
        assert_eq!(nf.0.status, 404);
        assert_eq!(nf.0.code, "PLANTS_NOT_FOUND");

        let fb = map_domain_error(&DomainError::forbidden(id), "/plants/x");
        assert_eq!(fb.0.status, 403);
        assert_eq!(fb.0.code, "PLANTS_FORBIDDEN");
        assert_eq!(fb.0.instance, "/plants/x");
    }

    #[test]
    fn internal_details_are_hidden() {
        let p = map_domain_error(&DomainError::database("disk I/O error"), "/plants");
        assert_eq!(p.0.status, 500);
        assert!(!p.0.detail.contains("disk"));
    }
}
