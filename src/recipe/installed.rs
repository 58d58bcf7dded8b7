// src/recipe/installed.rs

//! Installed-dependency queries
//!
//! Build arguments sometimes need facts about already-installed
//! dependencies, such as an MPI compiler wrapper path. The orchestrator that
//! owns the dependency graph answers these through [`InstalledDependencies`].

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Attributes with a conventional location under a package prefix
const WELL_KNOWN_ATTRIBUTES: &[(&str, &str)] = &[
    ("mpicc", "bin/mpicc"),
    ("mpicxx", "bin/mpicxx"),
    ("mpifc", "bin/mpif90"),
    ("mpif77", "bin/mpif77"),
    ("include", "include"),
    ("lib", "lib"),
];

/// Query interface for installed dependencies
pub trait InstalledDependencies {
    /// Installation prefix of a dependency
    fn prefix(&self, package: &str) -> Option<PathBuf>;

    /// A named attribute of a dependency (e.g. `mpicxx`)
    ///
    /// The default answers `prefix`/`home` and the well-known compiler
    /// wrapper and directory attributes relative to the prefix.
    fn attribute(&self, package: &str, attribute: &str) -> Option<String> {
        conventional_attribute(&self.prefix(package)?, attribute)
    }

    /// Like [`attribute`](Self::attribute) but fails with `MissingDependency`
    fn require(&self, package: &str, attribute: &str) -> Result<String> {
        self.attribute(package, attribute)
            .ok_or_else(|| Error::MissingDependency {
                package: package.to_string(),
                attribute: attribute.to_string(),
            })
    }
}

fn conventional_attribute(prefix: &Path, attribute: &str) -> Option<String> {
    if attribute == "prefix" || attribute == "home" {
        return Some(prefix.display().to_string());
    }
    WELL_KNOWN_ATTRIBUTES
        .iter()
        .find(|(name, _)| *name == attribute)
        .map(|(_, rel)| prefix.join(rel).display().to_string())
}

/// One installed package: prefix plus explicit attribute overrides
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstalledPackage {
    pub prefix: PathBuf,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

/// A fixed set of installed packages, typically read from config
///
/// ```toml
/// [installed.mpi]
/// prefix = "/opt/openmpi-4.1"
/// mpicxx = "/opt/openmpi-4.1/bin/mpic++"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct InstallTree {
    packages: BTreeMap<String, InstalledPackage>,
}

impl InstallTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an installed package
    pub fn with_package(mut self, name: impl Into<String>, prefix: impl Into<PathBuf>) -> Self {
        self.packages.insert(
            name.into(),
            InstalledPackage {
                prefix: prefix.into(),
                attributes: BTreeMap::new(),
            },
        );
        self
    }

    /// Override one attribute of a registered package
    pub fn with_attribute(
        mut self,
        name: &str,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        if let Some(pkg) = self.packages.get_mut(name) {
            pkg.attributes.insert(attribute.into(), value.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl InstalledDependencies for InstallTree {
    fn prefix(&self, package: &str) -> Option<PathBuf> {
        self.packages.get(package).map(|p| p.prefix.clone())
    }

    fn attribute(&self, package: &str, attribute: &str) -> Option<String> {
        let pkg = self.packages.get(package)?;
        match pkg.attributes.get(attribute) {
            Some(value) => Some(value.clone()),
            None => conventional_attribute(&pkg.prefix, attribute),
        }
    }
}
