use foundation_backend::repository::Export;
use foundation_backend::{DomainError, RepositoryError};
use serde_json::json;

use crate::support::{fields, foundation, volunteer};

#[test]
fn backup_and_restore() {
    let foundation = foundation();
    foundation
        .register_volunteer(volunteer("keep@example.org"))
        .unwrap();
    let key = foundation.create_backup().unwrap().data;
    assert!(key.starts_with("backup_"));

    foundation
        .register_volunteer(volunteer("later@example.org"))
        .unwrap();
    assert_eq!(foundation.volunteers(None).unwrap().len(), 2);

    foundation.restore_backup(&key).unwrap();
    let volunteers = foundation.volunteers(None).unwrap();
    assert_eq!(volunteers.len(), 1);
    assert_eq!(volunteers[0].str_field("email"), Some("keep@example.org"));

    let backups = foundation.list_backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].key, key);
    assert!(backups[0].size > 0);
}

#[test]
fn two_backups_get_distinct_keys() {
    let foundation = foundation();
    let first = foundation.create_backup().unwrap().data;
    let second = foundation.create_backup().unwrap().data;
    assert_ne!(first, second);
    assert_eq!(foundation.list_backups().unwrap().len(), 2);
}

#[test]
fn missing_backup() {
    let foundation = foundation();
    let err = foundation.restore_backup("backup_1").unwrap_err();
    assert!(matches!(
        err,
        DomainError::Repository(RepositoryError::BackupNotFound(_))
    ));
}

#[test]
fn export_format_and_wholesale_import() {
    let source = foundation();
    source
        .create_project(fields(json!({ "title": "Exported" })))
        .unwrap();
    let export = source.export_data().unwrap();
    assert_eq!(export.version, "1.0.0");
    assert!(export.data.contains_key("projects"));

    let encoded = serde_json::to_value(&export).unwrap();
    assert!(encoded.get("exported_at").is_some());

    let target = foundation();
    target
        .create_project(fields(json!({ "title": "Overwritten" })))
        .unwrap();
    let decoded: Export = serde_json::from_value(encoded).unwrap();
    target.import_data(&decoded).unwrap();

    let projects = target.projects(None).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].str_field("title"), Some("Exported"));
}

#[test]
fn malformed_import_writes_nothing() {
    let foundation = foundation();
    foundation
        .create_project(fields(json!({ "title": "Safe" })))
        .unwrap();
    let mut export = foundation.export_data().unwrap();
    export.data.insert("projects".into(), json!([]));
    export.data.insert("volunteers".into(), json!("not a list"));

    let err = foundation.import_data(&export).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Repository(RepositoryError::InvalidImport(_))
    ));
    assert_eq!(foundation.projects(None).unwrap().len(), 1);
}
