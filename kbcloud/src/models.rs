//! Models of the public KB Cloud API.

mod backup_repo;
mod mode_option_proxy;
mod org_update;
mod page_result;
mod param_tpl;

pub use backup_repo::{BackupRepo, BackupRepoAccessMethod, BackupRepoList};
pub use mode_option_proxy::ModeOptionProxy;
pub use org_update::OrgUpdate;
pub use page_result::PageResult;
pub use param_tpl::{ParamTplGet, ParamTplGetItem};
