use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{client::AccountsApi, error::AccountsError, model::User};
use crate::domain::service::Service;

/// In-process client delegating to the domain service.
pub struct AccountsLocalClient {
    service: Arc<Service>,
}

impl AccountsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AccountsApi for AccountsLocalClient {
    async fn authenticate(&self, token: &str) -> Result<User, AccountsError> {
        self.service.authenticate(token).await.map_err(|e| {
            if matches!(e, crate::domain::error::DomainError::Database { .. }) {
                tracing::error!(error = %e, "authentication lookup failed");
            }
            e.into()
        })
    }

    async fn get_user(&self, id: Uuid) -> Result<User, AccountsError> {
        self.service.get_user(id).await.map_err(Into::into)
    }
}
