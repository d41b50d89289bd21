// Copyright (C) 2026 by GiGa infosystems

//! Generate a diff between two [`Snapshot`]s, see [`diff`] and [`SnapshotDiff::between`].

use crate::Category;
use crate::snapshot::{Packages, Snapshot};
use itertools::{EitherOrBoth, Itertools};
use semver::Version;
use serde::Serialize;

/// What happened to a single package between two snapshots
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Only present after
    Installed,
    /// Present on both sides with different versions
    Updated,
    /// Only present before
    Removed,
    /// Present on both sides with the same version
    Unchanged,
}

impl Status {
    /// The statuses that get reported, in the order they get reported in
    pub const DISPLAYED: [Status; 3] = [Status::Installed, Status::Updated, Status::Removed];

    pub fn is_displayed(self) -> bool {
        self != Status::Unchanged
    }
}

/// How large an update is, if both versions are valid semantic versions
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Major,
    Minor,
    Patch,
    /// Only the pre-release or build metadata changed
    Prerelease,
    Downgrade,
    /// At least one side isn't a semantic version (e.g. a `file:` or `git` dependency)
    Unknown,
}

impl UpdateKind {
    pub fn between(before: &str, after: &str) -> Self {
        let (Ok(before), Ok(after)) = (Version::parse(before), Version::parse(after)) else {
            return UpdateKind::Unknown;
        };

        if after < before {
            UpdateKind::Downgrade
        } else if after.major != before.major {
            UpdateKind::Major
        } else if after.minor != before.minor {
            UpdateKind::Minor
        } else if after.patch != before.patch {
            UpdateKind::Patch
        } else {
            UpdateKind::Prerelease
        }
    }
}

/// The state of a single package name across two snapshots
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct DiffEntry<'a> {
    pub name: &'a str,
    pub before: Option<&'a str>,
    pub after: Option<&'a str>,
    pub status: Status,
}

impl DiffEntry<'_> {
    /// The kind of update, only for [`Status::Updated`] entries
    pub fn update_kind(&self) -> Option<UpdateKind> {
        match (self.status, self.before, self.after) {
            (Status::Updated, Some(before), Some(after)) => {
                Some(UpdateKind::between(before, after))
            }
            _ => None,
        }
    }
}

/// Diff two sets of packages
///
/// There is exactly one entry for every name on either side, in ascending order by name.
pub fn diff<'a>(before: &'a Packages, after: &'a Packages) -> Vec<DiffEntry<'a>> {
    before
        .iter()
        .merge_join_by(after, |(left, _), (right, _)| left.cmp(right))
        .map(|item| match item {
            EitherOrBoth::Left((name, version)) => DiffEntry {
                name,
                before: Some(version.as_str()),
                after: None,
                status: Status::Removed,
            },
            EitherOrBoth::Right((name, version)) => DiffEntry {
                name,
                before: None,
                after: Some(version.as_str()),
                status: Status::Installed,
            },
            EitherOrBoth::Both((name, before), (_, after)) => DiffEntry {
                name,
                before: Some(before.as_str()),
                after: Some(after.as_str()),
                status: if before == after {
                    Status::Unchanged
                } else {
                    Status::Updated
                },
            },
        })
        .collect()
}

/// The diff of both dependency categories of two [`Snapshot`]s
#[derive(Debug, Serialize)]
pub struct SnapshotDiff<'a> {
    pub dependencies: Vec<DiffEntry<'a>>,
    pub dev_dependencies: Vec<DiffEntry<'a>>,
}

impl<'a> SnapshotDiff<'a> {
    pub fn between(before: &'a Snapshot, after: &'a Snapshot) -> Self {
        SnapshotDiff {
            dependencies: diff(&before.dependencies, &after.dependencies),
            dev_dependencies: diff(&before.dev_dependencies, &after.dev_dependencies),
        }
    }

    pub fn entries(&self, category: Category) -> &[DiffEntry<'a>] {
        match category {
            Category::Dependencies => &self.dependencies,
            Category::DevDependencies => &self.dev_dependencies,
        }
    }

    /// All entries, regular dependencies first, together with their category
    pub fn iter(&self) -> impl Iterator<Item = (Category, &DiffEntry<'a>)> {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.entries(category).iter().map(move |e| (category, e)))
    }

    /// All entries with the given status, regular dependencies first
    pub fn with_status(&self, status: Status) -> impl Iterator<Item = (Category, &DiffEntry<'a>)> {
        self.iter().filter(move |(_, entry)| entry.status == status)
    }

    pub fn count(&self, status: Status) -> usize {
        self.with_status(status).count()
    }

    /// Whether anything other than [`Status::Unchanged`] entries exist
    pub fn has_changes(&self) -> bool {
        self.iter().any(|(_, entry)| entry.status.is_displayed())
    }
}
