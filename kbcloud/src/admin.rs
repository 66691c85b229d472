//! The KB Cloud admin API, served under `/admin/v1`.

pub mod apis;
pub mod models;

pub use apis::{BackupApi, EngineOptionApi};
