pub mod catalog_import;
pub mod error;
pub mod ports;
pub mod repo;
pub mod schedule;
pub mod service;
