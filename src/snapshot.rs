// Copyright (C) 2026 by GiGa infosystems

//! Read the top-level dependencies out of a `package-lock.json`

use crate::Category;
use color_eyre::{Result, eyre::WrapErr};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::Path};

/// Package names mapped to their versions
pub type Packages = BTreeMap<String, String>;

/// The root entry of the lockfile (`packages[""]`)
///
/// Everything else in the entry is ignored. `null` is treated the same as a missing key.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RootPackage {
    dependencies: Option<Packages>,
    dev_dependencies: Option<Packages>,
}

/// The top-level dependencies of a lockfile at one point in time
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize)]
pub struct Snapshot {
    pub dependencies: Packages,
    pub dev_dependencies: Packages,
}

impl Snapshot {
    /// Read the lockfile at `path`.
    ///
    /// A missing file is not an error, it results in an empty [`Snapshot`]. Malformed JSON is.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(?path, "no lockfile, starting from an empty snapshot");
                return Ok(Snapshot::default());
            }
            Err(err) => {
                return Err(err).wrap_err_with(|| format!("Failed to read lockfile {path:?}"));
            }
        };

        let snapshot = Self::from_json(&contents)
            .wrap_err_with(|| format!("Failed to parse lockfile {path:?}"))?;

        for category in Category::ALL {
            let packages = snapshot.packages(category).len();
            tracing::debug!(?path, %category, packages, "read lockfile");
        }

        Ok(snapshot)
    }

    /// Parse the contents of a lockfile.
    ///
    /// Version strings are taken as they are, without validation.
    pub fn from_json(contents: &str) -> Result<Self> {
        let lock: serde_json::Value = serde_json::from_str(contents)?;
        let root = Option::<RootPackage>::deserialize(&lock["packages"][""])?.unwrap_or_default();

        Ok(Snapshot {
            dependencies: root.dependencies.unwrap_or_default(),
            dev_dependencies: root.dev_dependencies.unwrap_or_default(),
        })
    }

    pub fn packages(&self, category: Category) -> &Packages {
        match category {
            Category::Dependencies => &self.dependencies,
            Category::DevDependencies => &self.dev_dependencies,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }
}
