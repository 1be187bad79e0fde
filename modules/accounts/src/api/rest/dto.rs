use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{NewAccount, Profile, ProfilePatch, Session, User};

/// REST view of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub description: String,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDto {
    #[serde(flatten)]
    pub user: UserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDto {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterReq {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileReq {
    pub username: Option<String>,
    pub description: Option<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            avatar: u.avatar,
            description: u.description,
            last_seen_at: u.last_seen_at,
            created_at: u.created_at,
        }
    }
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        Self {
            user: p.user.into(),
            plant_count: p.plant_count,
        }
    }
}

impl From<Session> for SessionDto {
    fn from(s: Session) -> Self {
        Self {
            token: s.token,
            token_type: "Bearer".to_string(),
            expires_at: s.expires_at,
            user: s.user.into(),
        }
    }
}

impl From<RegisterReq> for NewAccount {
    fn from(r: RegisterReq) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: r.password,
            password_confirm: r.password_confirm,
        }
    }
}

impl From<UpdateProfileReq> for ProfilePatch {
    fn from(r: UpdateProfileReq) -> Self {
        Self {
            username: r.username,
            description: r.description,
        }
    }
}
