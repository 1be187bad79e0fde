use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::client::PlantCounter;
use crate::contract::model::{NewAccount, Profile, ProfilePatch, Session, User};
use crate::domain::credentials;
use crate::domain::error::DomainError;
use crate::domain::repo::{SessionRecord, SessionsRepository, StoredUser, UsersRepository};

/// Registration, login sessions and profiles.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    sessions: Arc<dyn SessionsRepository>,
    plant_counter: Option<Arc<dyn PlantCounter>>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
    pub max_username_length: usize,
    pub max_description_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(72),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            max_username_length: 64,
            max_description_length: 1000,
        }
    }
}

fn db_err(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

impl Service {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        sessions: Arc<dyn SessionsRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            plant_counter: None,
            config,
        }
    }

    /// Profiles report a plant count once a counter is attached.
    pub fn with_plant_counter(mut self, counter: Arc<dyn PlantCounter>) -> Self {
        self.plant_counter = Some(counter);
        self
    }

    #[instrument(
        name = "accounts.service.register",
        skip(self, new),
        fields(username = %new.username)
    )]
    pub async fn register(&self, new: NewAccount) -> Result<User, DomainError> {
        info!("Registering user");

        let username = self.username(&new.username)?;
        let email = new.email.trim().to_string();
        if email.is_empty() {
            return Err(DomainError::validation("email", "is required"));
        }
        if !looks_like_email(&email) {
            return Err(DomainError::validation("email", "is not a valid address"));
        }
        if new.password.is_empty() {
            return Err(DomainError::validation("password", "is required"));
        }
        if new.password_confirm.is_empty() {
            return Err(DomainError::validation(
                "password_confirm",
                "repeating the password is required",
            ));
        }
        if new.password != new.password_confirm {
            return Err(DomainError::PasswordMismatch);
        }

        if self
            .users
            .username_exists(&username)
            .await
            .map_err(db_err)?
        {
            return Err(DomainError::username_taken(username));
        }

        let password_hash =
            credentials::hash_password(&new.password, self.config.bcrypt_cost).await?;
        let user = User {
            id: Uuid::new_v4(),
            avatar: credentials::gravatar_url(&email),
            username,
            email,
            description: String::new(),
            last_seen_at: None,
            created_at: Utc::now(),
        };

        self.users
            .insert(StoredUser {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(db_err)?;
        info!(id = %user.id, "User registered");
        Ok(user)
    }

    #[instrument(name = "accounts.service.login", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let stored = self
            .users
            .find_by_username(username.trim())
            .await
            .map_err(db_err)?
            .ok_or(DomainError::InvalidCredentials)?;
        if !credentials::verify_password(password, &stored.password_hash).await? {
            debug!("wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let now = Utc::now();
        match self.sessions.delete_expired(now).await {
            Ok(0) => {}
            Ok(n) => debug!(removed = n, "expired sessions purged"),
            Err(e) => warn!(error = %e, "failed to purge expired sessions"),
        }

        let token = credentials::generate_token();
        let expires_at = now + self.config.session_ttl;
        self.sessions
            .insert(SessionRecord {
                token_hash: credentials::hash_token(&token),
                user_id: stored.user.id,
                created_at: now,
                expires_at,
            })
            .await
            .map_err(db_err)?;

        info!(id = %stored.user.id, "User logged in");
        Ok(Session {
            token,
            user: stored.user,
            expires_at,
        })
    }

    /// Unknown tokens are ignored.
    #[instrument(name = "accounts.service.logout", skip_all)]
    pub async fn logout(&self, token: &str) -> Result<(), DomainError> {
        let removed = self
            .sessions
            .delete(&credentials::hash_token(token))
            .await
            .map_err(db_err)?;
        debug!(removed, "logout");
        Ok(())
    }

    #[instrument(name = "accounts.service.authenticate", skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let token_hash = credentials::hash_token(token);
        let session = self
            .sessions
            .find(&token_hash)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::Unauthenticated)?;

        let now = Utc::now();
        if session.expires_at <= now {
            debug!(user_id = %session.user_id, "session expired");
            if let Err(e) = self.sessions.delete(&token_hash).await {
                warn!(error = %e, "failed to delete expired session");
            }
            return Err(DomainError::Unauthenticated);
        }

        let mut user = self
            .users
            .find_by_id(session.user_id)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::Unauthenticated)?;
        self.users
            .touch_last_seen(user.id, now)
            .await
            .map_err(db_err)?;
        user.last_seen_at = Some(now);
        Ok(user)
    }

    #[instrument(name = "accounts.service.get_user", skip(self))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::UserNotFound { id })
    }

    /// Only the caller's own profile is visible.
    #[instrument(name = "accounts.service.get_profile", skip(self), fields(user_id = %user_id))]
    pub async fn get_profile(&self, user_id: Uuid, username: &str) -> Result<Profile, DomainError> {
        let user = self.own_user(user_id, username).await?;
        self.profile(user).await
    }

    #[instrument(
        name = "accounts.service.update_profile",
        skip(self, patch),
        fields(user_id = %user_id)
    )]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        username: &str,
        patch: ProfilePatch,
    ) -> Result<Profile, DomainError> {
        info!("Updating profile");
        let mut user = self.own_user(user_id, username).await?;

        if let Some(new_name) = patch.username {
            let new_name = self.username(&new_name)?;
            if new_name != user.username
                && self
                    .users
                    .username_exists(&new_name)
                    .await
                    .map_err(db_err)?
            {
                return Err(DomainError::username_taken(new_name));
            }
            user.username = new_name;
        }
        if let Some(description) = patch.description {
            let description = strip_tags(&description).trim().to_string();
            let len = description.chars().count();
            if len > self.config.max_description_length {
                return Err(DomainError::validation(
                    "description",
                    format!(
                        "too long: {len} characters (max: {})",
                        self.config.max_description_length
                    ),
                ));
            }
            user.description = description;
        }

        self.users.update_profile(&user).await.map_err(db_err)?;
        self.profile(user).await
    }

    async fn own_user(&self, user_id: Uuid, username: &str) -> Result<User, DomainError> {
        let user = self.get_user(user_id).await?;
        if user.username != username {
            return Err(DomainError::profile_not_found(username));
        }
        Ok(user)
    }

    async fn profile(&self, user: User) -> Result<Profile, DomainError> {
        let plant_count = match &self.plant_counter {
            Some(counter) => Some(counter.plant_count(user.id).await.map_err(db_err)?),
            None => None,
        };
        Ok(Profile { user, plant_count })
    }

    fn username(&self, raw: &str) -> Result<String, DomainError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DomainError::validation("username", "is required"));
        }
        let len = name.chars().count();
        if len > self.config.max_username_length {
            return Err(DomainError::validation(
                "username",
                format!(
                    "too long: {len} characters (max: {})",
                    self.config.max_username_length
                ),
            ));
        }
        // usernames appear in URL paths
        if name.chars().any(|c| c.is_whitespace() || c == '/' || c == '?' || c == '#') {
            return Err(DomainError::validation(
                "username",
                "must not contain whitespace, '/', '?' or '#'",
            ));
        }
        Ok(name.to_string())
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
}

/// Remove markup tags, keeping the text between them.
///
/// A `<` only opens a tag when a letter, `/` or `!` follows and a `>` closes
/// it later on; any other `<` is ordinary text.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');
        match after.find('>') {
            Some(end) if opens_tag => rest = &after[end + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
