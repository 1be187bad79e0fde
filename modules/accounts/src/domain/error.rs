use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User {username} is already registered")]
    UsernameTaken { username: String },

    #[error("Given passwords are not the same")]
    PasswordMismatch,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Profile not found: {username}")]
    ProfileNotFound { username: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Password hashing failed: {message}")]
    Hashing { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }

    pub fn profile_not_found(username: impl Into<String>) -> Self {
        Self::ProfileNotFound {
            username: username.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
