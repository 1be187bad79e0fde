//! SeaORM-backed implementations of the accounts repository ports.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::contract::model::User;
use crate::domain::repo::{SessionRecord, SessionsRepository, StoredUser, UsersRepository};
use crate::infra::storage::entity::{session, user};
use crate::infra::storage::mapper;

pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(mapper::user_to_contract))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<StoredUser>> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("find_by_username failed")?;
        Ok(found.map(mapper::stored_from_model))
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .context("username_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, user: StoredUser) -> anyhow::Result<()> {
        let _ = mapper::stored_to_active(user)
            .insert(&self.conn)
            .await
            .context("insert failed")?;
        Ok(())
    }

    async fn update_profile(&self, u: &User) -> anyhow::Result<()> {
        let m = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username.clone()),
            description: Set(u.description.clone()),
            ..Default::default()
        };
        let _ = m.update(&self.conn).await.context("update_profile failed")?;
        Ok(())
    }

    async fn touch_last_seen(&self, id: Uuid, at: DateTime<Utc>) -> anyhow::Result<()> {
        user::Entity::update_many()
            .col_expr(user::Column::LastSeenAt, Expr::value(at))
            .filter(user::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("touch_last_seen failed")?;
        Ok(())
    }
}

pub struct SeaOrmSessionsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmSessionsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> SessionsRepository for SeaOrmSessionsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, session: SessionRecord) -> anyhow::Result<()> {
        let _ = mapper::session_to_active(session)
            .insert(&self.conn)
            .await
            .context("session insert failed")?;
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> anyhow::Result<Option<SessionRecord>> {
        let found = session::Entity::find_by_id(token_hash.to_owned())
            .one(&self.conn)
            .await
            .context("session find failed")?;
        Ok(found.map(mapper::session_to_record))
    }

    async fn delete(&self, token_hash: &str) -> anyhow::Result<bool> {
        let res = session::Entity::delete_by_id(token_hash.to_owned())
            .exec(&self.conn)
            .await
            .context("session delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let res = session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(&self.conn)
            .await
            .context("session purge failed")?;
        Ok(res.rows_affected)
    }
}
