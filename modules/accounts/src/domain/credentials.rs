//! Password hashing, session tokens and avatar links.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::error::DomainError;

const TOKEN_BYTES: usize = 32;

/// Random session token, hex encoded.
pub fn generate_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Digest under which a token is stored.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Gravatar identicon for an e-mail address.
pub fn gravatar_url(email: &str) -> String {
    let digest = hex::encode(Sha256::digest(email.trim().to_lowercase().as_bytes()));
    format!("https://www.gravatar.com/avatar/{digest}?d=identicon&s=128")
}

/// bcrypt is CPU bound, so it runs on the blocking pool.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| DomainError::Hashing {
            message: e.to_string(),
        })?
        .map_err(|e| DomainError::Hashing {
            message: e.to_string(),
        })
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| DomainError::Hashing {
            message: e.to_string(),
        })?
        .map_err(|e| DomainError::Hashing {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_random_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn token_hash_is_stable_and_differs_from_token() {
        let t = "abc";
        assert_eq!(hash_token(t), hash_token(t));
        assert_ne!(hash_token(t), t);
        assert_eq!(
            hash_token(t),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn gravatar_ignores_case_and_whitespace() {
        let a = gravatar_url(" Someone@Example.com ");
        assert_eq!(a, gravatar_url("someone@example.com"));
        assert!(a.starts_with("https://www.gravatar.com/avatar/"));
        assert!(a.ends_with("?d=identicon&s=128"));
    }

    #[tokio::test]
    async fn password_roundtrip_with_low_cost() {
        let hash = hash_password("hunter2", 4).await.unwrap();
        assert!(verify_password("hunter2", &hash).await.unwrap());
        assert!(!verify_password("hunter3", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn invalid_cost_is_a_hashing_error() {
        assert!(matches!(
            hash_password("x", 2).await,
            Err(DomainError::Hashing { .. })
        ));
    }
}
