//! Plant catalog, users' plant collections and the watering scheduler.

// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::{client, error, model};

pub mod module;
pub use module::PlantCare;

pub mod import;

// === INTERNAL MODULES ===
// Exposed for tests; other crates should only rely on `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
