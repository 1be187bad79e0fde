use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::User;

/// A user row together with its bcrypt hash. Stays inside the module.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Server-side half of a session: only the token digest is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<StoredUser>>;
    async fn username_exists(&self, username: &str) -> anyhow::Result<bool>;
    async fn insert(&self, user: StoredUser) -> anyhow::Result<()>;
    /// Writes username and description.
    async fn update_profile(&self, user: &User) -> anyhow::Result<()>;
    async fn touch_last_seen(&self, id: Uuid, at: DateTime<Utc>) -> anyhow::Result<()>;
}

#[async_trait]
pub trait SessionsRepository: Send + Sync {
    async fn insert(&self, session: SessionRecord) -> anyhow::Result<()>;
    async fn find(&self, token_hash: &str) -> anyhow::Result<Option<SessionRecord>>;
    /// Returns true if a session was removed.
    async fn delete(&self, token_hash: &str) -> anyhow::Result<bool>;
    /// Drop every session that expired at or before `now`; returns how many.
    async fn delete_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64>;
}
