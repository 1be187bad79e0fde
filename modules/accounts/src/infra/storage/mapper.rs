use sea_orm::Set;

use crate::contract::model::User;
use crate::domain::repo::{SessionRecord, StoredUser};
use crate::infra::storage::entity::{session, user};

pub fn user_to_contract(m: user::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        avatar: m.avatar,
        description: m.description,
        last_seen_at: m.last_seen_at,
        created_at: m.created_at,
    }
}

pub fn stored_from_model(mut m: user::Model) -> StoredUser {
    let password_hash = std::mem::take(&mut m.password_hash);
    StoredUser {
        user: user_to_contract(m),
        password_hash,
    }
}

pub fn stored_to_active(s: StoredUser) -> user::ActiveModel {
    let u = s.user;
    user::ActiveModel {
        id: Set(u.id),
        username: Set(u.username),
        email: Set(u.email),
        avatar: Set(u.avatar),
        password_hash: Set(s.password_hash),
        description: Set(u.description),
        last_seen_at: Set(u.last_seen_at),
        created_at: Set(u.created_at),
    }
}

pub fn session_to_record(m: session::Model) -> SessionRecord {
    SessionRecord {
        token_hash: m.token_hash,
        user_id: m.user_id,
        created_at: m.created_at,
        expires_at: m.expires_at,
    }
}

pub fn session_to_active(r: SessionRecord) -> session::ActiveModel {
    session::ActiveModel {
        token_hash: Set(r.token_hash),
        user_id: Set(r.user_id),
        created_at: Set(r.created_at),
        expires_at: Set(r.expires_at),
    }
}
