//! Models of the admin API.

mod backup;
mod engine_option_history;

pub use backup::{Backup, BackupStatus, BackupType};
pub use engine_option_history::{EngineOptionHistory, EngineOptionHistoryList};
