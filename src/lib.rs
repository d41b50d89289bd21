// Copyright (C) 2026 by GiGa infosystems

//! `npm-installdiff` wraps `npm install` and reports which top-level dependencies were installed,
//! updated or removed by it.
//!
//! The order of operations is:
//! * Read the lockfile before the install with [`snapshot::Snapshot::read`]
//! * Run the install command with [`util::install`]
//! * Read the lockfile again, and diff both with [`diff::SnapshotDiff::between`]
//! * Render the diff with [`present::render`]
//!
//! Only the root entry of `package-lock.json` (`packages[""]`) is looked at, so transitive
//! dependencies never show up in the report.

use serde::Serialize;
use std::fmt;

/// The two independent sets of top-level dependencies in a lockfile
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub enum Category {
    /// `dependencies`
    Dependencies,
    /// `devDependencies`
    DevDependencies,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Dependencies, Category::DevDependencies];

    /// The key of this category in the lockfile
    pub const fn key(self) -> &'static str {
        match self {
            Category::Dependencies => "dependencies",
            Category::DevDependencies => "devDependencies",
        }
    }

    /// The short label used in rendered output
    pub const fn label(self) -> &'static str {
        match self {
            Category::Dependencies => "dep",
            Category::DevDependencies => "dev",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

mod cmd;

pub mod diff;
pub mod present;
pub mod snapshot;
pub mod util;
