use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::error::AccountsError;
use crate::contract::model::User;

/// Public API of the accounts module for in-process consumers.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Resolve a session token to its user and mark the user as seen.
    async fn authenticate(&self, token: &str) -> Result<User, AccountsError>;

    async fn get_user(&self, id: Uuid) -> Result<User, AccountsError>;
}

/// Port implemented by the module that owns users' plants, so profiles can
/// show a plant count without accounts depending on it.
#[async_trait]
pub trait PlantCounter: Send + Sync {
    async fn plant_count(&self, user_id: Uuid) -> anyhow::Result<u64>;
}
