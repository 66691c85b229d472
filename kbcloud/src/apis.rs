//! Operations of the public KB Cloud API.

mod backup_repo_api;
mod organization_api;
mod param_tpl_api;

pub use backup_repo_api::{BackupRepoApi, ListBackupReposOptionalParameters};
pub use organization_api::OrganizationApi;
pub use param_tpl_api::ParamTplApi;
