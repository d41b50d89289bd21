// Copyright (C) 2026 by GiGa infosystems

use npm_installdiff::Category;
use npm_installdiff::diff::{SnapshotDiff, Status, UpdateKind};
use npm_installdiff::present::{Plain, render};
use npm_installdiff::snapshot::Snapshot;
use std::fs;

const BEFORE: &str = r#"{
  "name": "app",
  "version": "1.0.0",
  "lockfileVersion": 3,
  "requires": true,
  "packages": {
    "": {
      "name": "app",
      "version": "1.0.0",
      "dependencies": { "lodash": "4.17.20" }
    },
    "node_modules/lodash": { "version": "4.17.20" }
  }
}"#;

const AFTER: &str = r#"{
  "name": "app",
  "version": "1.0.0",
  "lockfileVersion": 3,
  "requires": true,
  "packages": {
    "": {
      "name": "app",
      "version": "1.0.0",
      "dependencies": { "lodash": "4.17.21", "axios": "1.0.0" }
    },
    "node_modules/axios": { "version": "1.0.0" },
    "node_modules/lodash": { "version": "4.17.21" }
  }
}"#;

#[test]
fn lockfile_rewritten_by_an_install() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package-lock.json");

    fs::write(&path, BEFORE).unwrap();
    let before = Snapshot::read(&path).unwrap();
    fs::write(&path, AFTER).unwrap();
    let after = Snapshot::read(&path).unwrap();

    let diff = SnapshotDiff::between(&before, &after);
    assert!(diff.entries(Category::DevDependencies).is_empty());

    let entries = diff.entries(Category::Dependencies);
    assert_eq!(entries.len(), 2);

    let axios = entries.iter().find(|entry| entry.name == "axios").unwrap();
    assert_eq!(axios.status, Status::Installed);
    assert_eq!((axios.before, axios.after), (None, Some("1.0.0")));

    let lodash = entries.iter().find(|entry| entry.name == "lodash").unwrap();
    assert_eq!(lodash.status, Status::Updated);
    assert_eq!((lodash.before, lodash.after), (Some("4.17.20"), Some("4.17.21")));
    assert_eq!(lodash.update_kind(), Some(UpdateKind::Patch));

    assert_eq!(
        render(&diff, &Plain),
        "Installed:\n  dep axios   1.0.0\nUpdated:\n  dep lodash  4.17.20 -> 4.17.21\n"
    );
}

#[test]
fn first_install_without_a_lockfile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package-lock.json");

    let before = Snapshot::read(&path).unwrap();
    assert!(before.is_empty());

    fs::write(&path, AFTER).unwrap();
    let after = Snapshot::read(&path).unwrap();

    let diff = SnapshotDiff::between(&before, &after);
    assert_eq!(diff.count(Status::Installed), 2);
    assert_eq!(
        render(&diff, &Plain),
        "Installed:\n  dep axios   1.0.0\n  dep lodash  4.17.21\n"
    );
}

#[test]
fn lockfile_deleted_by_an_install() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package-lock.json");

    fs::write(&path, BEFORE).unwrap();
    let before = Snapshot::read(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let after = Snapshot::read(&path).unwrap();

    let diff = SnapshotDiff::between(&before, &after);
    assert_eq!(render(&diff, &Plain), "Removed:\n  dep lodash  4.17.20\n");
}
