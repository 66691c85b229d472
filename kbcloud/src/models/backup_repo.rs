use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use kbcloud_common::{AdditionalProperties, Decoded};
use kbcloud_macro::{Model, StringEnum};

use super::PageResult;

/// How backup data reaches the repository.
#[derive(StringEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackupRepoAccessMethod {
    /// The repository is mounted into the backup pods.
    #[default]
    Mount,
    /// A backup tool talks to the repository directly.
    Tool,
}

/// Where backups are stored.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct BackupRepo {
    name: String,
    storage_provider: String,
    access_method: Option<BackupRepoAccessMethod>,
    /// Whether new backups go here unless told otherwise.
    #[model(rename = "default")]
    is_default: Option<bool>,
    /// Provider specific settings such as bucket and region.
    config: Option<HashMap<String, String>>,
    created_at: Option<DateTime<FixedOffset>>,
    pub additional_properties: AdditionalProperties,
}

/// A page of backup repositories. A repository the client cannot
/// represent stays unparsed on its own.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct BackupRepoList {
    items: Vec<Decoded<BackupRepo>>,
    page_result: Option<PageResult>,
    pub additional_properties: AdditionalProperties,
}
