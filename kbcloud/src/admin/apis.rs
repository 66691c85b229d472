//! Operations of the admin API.

mod backup_api;
mod engine_option_api;

pub use backup_api::BackupApi;
pub use engine_option_api::EngineOptionApi;
