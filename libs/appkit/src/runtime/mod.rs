pub mod runner;
pub mod shutdown;

pub use runner::{build_router, run, RunOptions, ShutdownOptions};
