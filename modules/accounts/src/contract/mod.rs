pub mod client;
pub mod error;
pub mod model;

pub use client::{AccountsApi, PlantCounter};
pub use error::AccountsError;
pub use model::{NewAccount, Profile, ProfilePatch, Session, User};
