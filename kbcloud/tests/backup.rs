use chrono::{FixedOffset, TimeZone, Utc};
use kbcloud::admin::models::{Backup, BackupStatus, BackupType};
use kbcloud::{DecodeError, Decoded, Model};
use serde_json::{Value, json};
use test_log::test;

fn required_only() -> Value {
    json!({
        "autoBackup": true,
        "backupMethod": "xtrabackup",
        "backupPolicyName": "mysql-backup-policy",
        "backupType": "Full",
        "completionTimestamp": "2024-05-01T12:40:00Z",
        "creationTimestamp": "2024-05-01T12:30:00Z",
        "duration": "10m",
        "name": "backup-20240501",
        "orgName": "acme",
        "snapshotVolumes": false,
        "sourceCluster": "mysql-prod",
        "startTimestamp": "2024-05-01T12:30:05Z",
        "status": "Completed",
        "totalSize": "1.2Gi"
    })
}

fn decode(value: &Value) -> Result<Decoded<Backup>, DecodeError> {
    Backup::from_json(&serde_json::to_vec(value).unwrap())
}

#[test]
fn test_required_fields_only() -> anyhow::Result<()> {
    let backup = decode(&required_only())?.into_valid()?;

    assert!(*backup.auto_backup());
    assert_eq!(backup.backup_method(), "xtrabackup");
    assert_eq!(*backup.backup_type(), BackupType::Full);
    assert_eq!(*backup.status(), BackupStatus::Completed);
    assert_eq!(
        *backup.creation_timestamp(),
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    );
    assert!(!backup.has_backup_repo());
    assert_eq!(backup.backup_repo(), None);
    assert_eq!(backup.backup_repo_or_default(), "");
    assert!(!backup.has_target_pods());
    assert!(backup.additional_properties.is_empty());
    Ok(())
}

#[test]
fn test_empty_object_names_first_required_field() {
    let err = decode(&json!({})).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::MissingField {
            model: "Backup",
            field: "autoBackup"
        }
    ));
    assert_eq!(err.to_string(), "required field autoBackup missing");
}

#[test]
fn test_each_required_field_is_checked() {
    for field in Backup::FIELDS {
        let mut payload = required_only();
        let Some(object) = payload.as_object_mut() else {
            unreachable!()
        };
        if object.remove(*field).is_none() {
            continue;
        }
        match decode(&payload) {
            Err(DecodeError::MissingField { field: missing, .. }) => assert_eq!(missing, *field),
            other => panic!("dropping {field} gave {other:?}"),
        }
    }
}

#[test]
fn test_unknown_status_degrades_without_error() -> anyhow::Result<()> {
    let mut payload = required_only();
    payload["status"] = json!("Archived");
    let decoded = decode(&payload)?;

    assert!(!decoded.is_valid());
    let raw = decoded.unparsed_object().cloned().map(Value::Object);
    assert_eq!(raw, Some(payload.clone()));

    // re-encoding keeps the server's payload
    let out: Value = serde_json::from_slice(&kbcloud_common::codec::marshal(&decoded)?)?;
    assert_eq!(out, payload);

    let err = decoded.into_valid().unwrap_err();
    assert!(matches!(err, DecodeError::Unparsed { model: "Backup" }));
    Ok(())
}

#[test]
fn test_wrong_type_degrades_without_error() -> anyhow::Result<()> {
    let mut payload = required_only();
    payload["snapshotVolumes"] = json!("yes");
    assert!(!decode(&payload)?.is_valid());

    let mut payload = required_only();
    payload["creationTimestamp"] = json!("yesterday");
    assert!(!decode(&payload)?.is_valid());
    Ok(())
}

#[test]
fn test_future_field_round_trips() -> anyhow::Result<()> {
    let mut payload = required_only();
    payload["futureField"] = json!(42);
    payload["backupRepo"] = json!("s3-repo");
    payload["targetPods"] = json!(["mysql-0", "mysql-1"]);

    let backup = decode(&payload)?.into_valid()?;
    assert_eq!(backup.additional_properties.get("futureField"), Some(&json!(42)));
    assert_eq!(backup.backup_repo().map(String::as_str), Some("s3-repo"));
    assert_eq!(backup.target_pods_or_default(), vec!["mysql-0", "mysql-1"]);

    let out: Value = serde_json::from_slice(&backup.to_json()?)?;
    assert_eq!(out, payload);
    Ok(())
}

#[test]
fn test_timestamps_on_the_wire() -> anyhow::Result<()> {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap().fixed_offset();
    let mut backup = Backup::new(
        false,
        "volume-snapshot".to_string(),
        "policy".to_string(),
        BackupType::Incremental,
        start + chrono::Duration::milliseconds(1500),
        start,
        "1s".to_string(),
        "b1".to_string(),
        "acme".to_string(),
        true,
        "pg".to_string(),
        start,
        BackupStatus::Running,
        "0".to_string(),
    );
    backup.set_expiration(start + chrono::Duration::nanoseconds(987_654_321));

    let out: Value = serde_json::from_slice(&backup.to_json()?)?;
    assert_eq!(out["creationTimestamp"], "2024-05-01T12:30:00Z");
    assert_eq!(out["completionTimestamp"], "2024-05-01T12:30:01.500Z");
    assert_eq!(out["expiration"], "2024-05-01T12:30:00.987Z");
    assert_eq!(out["backupType"], "Incremental");
    assert_eq!(out["status"], "Running");
    assert!(out.get("backupRepo").is_none());
    Ok(())
}

#[test]
fn test_timestamp_offset_is_kept() -> anyhow::Result<()> {
    let mut payload = required_only();
    payload["completionTimestamp"] = json!("2024-05-01T20:40:00+08:00");
    let backup = decode(&payload)?.into_valid()?;

    let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
    assert_eq!(backup.completion_timestamp().offset(), &shanghai);
    assert_eq!(
        *backup.completion_timestamp(),
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 40, 0).unwrap()
    );

    let out: Value = serde_json::from_slice(&backup.to_json()?)?;
    assert_eq!(out, payload);
    Ok(())
}

#[test]
fn test_mutators() -> anyhow::Result<()> {
    let mut backup = decode(&required_only())?.into_valid()?;
    backup.set_backup_repo("oss".to_string());
    assert!(backup.has_backup_repo());
    backup.unset_backup_repo();
    assert!(!backup.has_backup_repo());

    let backup = backup
        .with_status(BackupStatus::Failed)
        .with_failure_reason("disk full".to_string());
    assert_eq!(*backup.status(), BackupStatus::Failed);
    assert_eq!(backup.failure_reason().map(String::as_str), Some("disk full"));
    Ok(())
}

#[test]
fn test_malformed_payload_is_an_error() {
    assert!(matches!(
        Backup::from_json(b"{").unwrap_err(),
        DecodeError::Codec(_)
    ));
    assert!(matches!(
        Backup::from_json(b"[]").unwrap_err(),
        DecodeError::NotAnObject
    ));
    assert!(matches!(
        Backup::from_json(b"null").unwrap_err(),
        DecodeError::MissingField { field: "autoBackup", .. }
    ));
}

#[test]
fn test_enum_values() {
    assert_eq!(
        BackupStatus::ALLOWED_VALUES,
        ["New", "InProgress", "Running", "Completed", "Failed", "Deleting"]
    );
    assert_eq!("InProgress".parse::<BackupStatus>(), Ok(BackupStatus::InProgress));
    let err = "Archived".parse::<BackupStatus>().unwrap_err();
    assert_eq!(err.to_string(), "invalid value 'Archived' for enum BackupStatus");
    assert!(BackupType::is_valid("Continuous"));
    assert!(!BackupType::is_valid("full"));
    assert_eq!(BackupType::Differential.to_string(), "Differential");
}
