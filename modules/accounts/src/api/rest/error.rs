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

pub fn unauthenticated(detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::UNAUTHORIZED,
        "ACCOUNTS_UNAUTHENTICATED",
        "Unauthorized",
        detail,
        instance,
    )
}

/// Map a domain error to an RFC 9457 response.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UsernameTaken { .. } => from_parts(
            StatusCode::CONFLICT,
            "ACCOUNTS_USERNAME_TAKEN",
            "Username taken",
            e.to_string(),
            instance,
        ),
        DomainError::PasswordMismatch | DomainError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        DomainError::InvalidCredentials => from_parts(
            StatusCode::UNAUTHORIZED,
            "ACCOUNTS_INVALID_CREDENTIALS",
            "Invalid credentials",
            e.to_string(),
            instance,
        ),
        DomainError::Unauthenticated => unauthenticated(e.to_string(), instance),
        DomainError::UserNotFound { .. } | DomainError::ProfileNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "ACCOUNTS_USER_NOT_FOUND",
            "User not found",
            e.to_string(),
            instance,
        ),
        DomainError::Hashing { .. } | DomainError::Database { .. } => {
            tracing::error!(error = ?e, "internal error");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "ACCOUNTS_INTERNAL",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
    }
}
