//! # AppKit
//!
//! Small module runtime shared by the PlantCare modules.
//!
//! - Modules implement [`Module`] and, when needed, [`DbModule`] / [`RestfulModule`].
//! - Modules talk to each other through contract traits published in the [`ClientHub`].
//! - [`runtime::run`] drives the phases: init → db → rest → serve → stop.
//!
//! ```rust,ignore
//! let registry = ModuleRegistry::new()
//!     .with_full_module(Arc::new(accounts::Accounts::default()))
//!     .with_full_module(Arc::new(plant_care::PlantCare::default()));
//! appkit::run(RunOptions { registry, .. }).await?;
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod api;
pub mod client_hub;
pub mod context;
pub mod contracts;
pub mod db;
pub mod http;
pub mod registry;
pub mod runtime;

pub use api::pagination::{page_count, Page, PageRequest};
pub use api::problem::{bad_request, Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};
pub use client_hub::{ClientHub, ClientHubError};
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
pub use contracts::{DbModule, Module, RestfulModule};
pub use registry::ModuleRegistry;
pub use runtime::{run, RunOptions, ShutdownOptions};
