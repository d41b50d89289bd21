// Copyright (C) 2026 by GiGa infosystems

//! Runs the binary against a shell script standing in for `npm`

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FAKE_NPM: &str = r#"#!/bin/sh
[ "$1" = install ] || exit 64
shift
printf '%s\n' "$*" > args.txt
if [ -n "$FAKE_EXIT" ]; then exit "$FAKE_EXIT"; fi
if [ -n "$FAKE_LOCK" ]; then cp "$FAKE_LOCK" package-lock.json; fi
"#;

fn lockfile(dependencies: &str, dev_dependencies: &str) -> String {
    format!(
        r#"{{ "lockfileVersion": 3, "packages": {{ "": {{
            "dependencies": {dependencies},
            "devDependencies": {dev_dependencies}
        }} }} }}"#
    )
}

struct Project {
    dir: tempfile::TempDir,
    npm: PathBuf,
}

impl Project {
    fn new(npm: &Path) -> Self {
        Project {
            dir: tempfile::tempdir().unwrap(),
            npm: npm.to_owned(),
        }
    }

    fn lockfile(&self) -> PathBuf {
        self.dir.path().join("package-lock.json")
    }

    fn write_lockfile(&self, contents: &str) {
        fs::write(self.lockfile(), contents).unwrap();
    }

    /// Stage the lockfile the fake install leaves behind
    fn next_lockfile(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join("next.json");
        fs::write(&path, contents).unwrap();
        path
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_npm-installdiff"));
        cmd.arg("--diff-lockfile")
            .arg(self.lockfile())
            .arg("--diff-npm")
            .arg(&self.npm)
            .arg("--diff-color=never")
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("FAKE_EXIT")
            .env_remove("FAKE_LOCK");
        cmd
    }

    fn passed_args(&self) -> String {
        fs::read_to_string(self.dir.path().join("args.txt")).unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

// The scenarios share a single test so no other test thread forks while the script is being
// written (which makes executing it fail with `ETXTBSY`)
#[test]
fn install_scenarios() {
    let scripts = tempfile::tempdir().unwrap();
    let npm = scripts.path().join("npm");
    fs::write(&npm, FAKE_NPM).unwrap();
    fs::set_permissions(&npm, fs::Permissions::from_mode(0o755)).unwrap();

    reports_installed_and_updated(&npm);
    mirrors_a_failing_install(&npm);
    lists_snapshots_without_a_lockfile(&npm);
    reports_when_nothing_changed(&npm);
    fails_on_a_malformed_lockfile(&npm);
    prints_json(&npm);
}

fn reports_installed_and_updated(npm: &Path) {
    let project = Project::new(npm);
    project.write_lockfile(&lockfile(r#"{ "lodash": "4.17.20" }"#, "{}"));
    let next = project.next_lockfile(&lockfile(
        r#"{ "lodash": "4.17.21", "axios": "1.0.0" }"#,
        r#"{ "jest": "29.7.0" }"#,
    ));

    let output = project
        .command(&["--save", "axios", "--diff-verbose"])
        .env("FAKE_LOCK", next)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(project.passed_args(), "--save axios\n");
    assert_eq!(
        stdout(&output),
        "\
Installed:
  dep axios   1.0.0
  dev jest    29.7.0
Updated:
  dep lodash  4.17.20 -> 4.17.21
"
    );
}

fn mirrors_a_failing_install(npm: &Path) {
    let project = Project::new(npm);
    let original = lockfile(r#"{ "lodash": "4.17.20" }"#, "{}");
    project.write_lockfile(&original);
    let next = project.next_lockfile(&lockfile("{}", "{}"));

    let output = project
        .command(&["no-such-package"])
        .env("FAKE_EXIT", "3")
        .env("FAKE_LOCK", next)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("install no-such-package` failed"));
    assert_eq!(fs::read_to_string(project.lockfile()).unwrap(), original);
}

fn lists_snapshots_without_a_lockfile(npm: &Path) {
    let project = Project::new(npm);
    let next = project.next_lockfile(&lockfile(r#"{ "react": "18.2.0" }"#, "{}"));

    let output = project
        .command(&["--diff-list", "react"])
        .env("FAKE_LOCK", next)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(project.passed_args(), "react\n");
    assert_eq!(
        stdout(&output),
        "\
Before:
  (no dependencies)

After:
  dep react  18.2.0

Installed:
  dep react  18.2.0
"
    );
}

fn reports_when_nothing_changed(npm: &Path) {
    let project = Project::new(npm);
    project.write_lockfile(&lockfile(r#"{ "lodash": "4.17.21" }"#, "{}"));

    let output = project.command(&[]).output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(project.passed_args(), "\n");
    assert_eq!(stdout(&output), "No dependencies changed.\n");
}

fn fails_on_a_malformed_lockfile(npm: &Path) {
    let project = Project::new(npm);
    project.write_lockfile("{ \"packages\": ");

    let output = project.command(&[]).output().unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to parse lockfile"));
}

fn prints_json(npm: &Path) {
    let project = Project::new(npm);
    project.write_lockfile(&lockfile(r#"{ "lodash": "4.17.20" }"#, r#"{ "jest": "29.7.0" }"#));
    let next = project.next_lockfile(&lockfile(r#"{ "lodash": "5.0.0" }"#, r#"{ "jest": "29.7.0" }"#));

    let output = project
        .command(&["--diff-json"])
        .env("FAKE_LOCK", next)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "dependencies": [
                { "name": "lodash", "before": "4.17.20", "after": "5.0.0", "status": "updated" }
            ],
            "dev_dependencies": [
                { "name": "jest", "before": "29.7.0", "after": "29.7.0", "status": "unchanged" }
            ]
        })
    );
}
