use chrono::{DateTime, FixedOffset};
use kbcloud_common::AdditionalProperties;
use kbcloud_macro::{Model, StringEnum};

/// What a backup contains relative to earlier backups.
#[derive(StringEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackupType {
    #[default]
    Full,
    Incremental,
    Differential,
    Continuous,
}

#[derive(StringEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackupStatus {
    #[default]
    New,
    InProgress,
    Running,
    Completed,
    Failed,
    Deleting,
}

/// A backup of a KubeBlocks cluster.
#[derive(Model, Clone, Debug, Default, PartialEq)]
pub struct Backup {
    /// Whether the backup was taken by a schedule.
    auto_backup: bool,
    backup_method: String,
    /// The backup policy applied to take this backup.
    backup_policy_name: String,
    /// Name of the repository holding the backup data.
    backup_repo: Option<String>,
    backup_type: BackupType,
    completion_timestamp: DateTime<FixedOffset>,
    creation_timestamp: DateTime<FixedOffset>,
    /// How long the backup took, as reported by the server.
    duration: String,
    name: String,
    org_name: String,
    /// Whether volume snapshots were used.
    snapshot_volumes: bool,
    source_cluster: String,
    start_timestamp: DateTime<FixedOffset>,
    status: BackupStatus,
    /// End of the time range a continuous backup covers.
    time_range_end: Option<DateTime<FixedOffset>>,
    /// Start of the time range a continuous backup covers.
    time_range_start: Option<DateTime<FixedOffset>>,
    total_size: String,
    failure_reason: Option<String>,
    extras: Option<String>,
    target_pods: Option<Vec<String>>,
    /// Location of the data inside the repository.
    path: Option<String>,
    retention_period: Option<String>,
    expiration: Option<DateTime<FixedOffset>>,
    id: Option<String>,
    cluster_id: Option<String>,
    cloud_provider: Option<String>,
    cloud_region: Option<String>,
    environment_name: Option<String>,
    engine: Option<String>,
    pub additional_properties: AdditionalProperties,
}
