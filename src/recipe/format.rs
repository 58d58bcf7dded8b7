// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files. This module holds the raw serde shapes; the parser
//! compiles them into a [`RecipeDescriptor`](super::RecipeDescriptor), turning
//! guard strings and dependency specs into typed values.
//!
//! ```toml
//! [package]
//! name = "dakota"
//! url = "https://example.org/dakota-6.12-public.src.tar.gz"
//! build_system = "cmake"
//!
//! [[versions]]
//! version = "6.12"
//! sha256 = "4d69f9cb..."
//!
//! [[variants]]
//! name = "mpi"
//! default = true
//!
//! [[depends_on]]
//! spec = "mpi"
//! when = "+mpi"
//! ```

use crate::recipe::cmake::OffPolicy;
use crate::recipe::descriptor::BuildSystem;
use serde::{Deserialize, Serialize};

/// A complete recipe file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFile {
    /// Package metadata
    pub package: PackageSection,

    /// Known versions, conventionally newest first
    #[serde(default)]
    pub versions: Vec<VersionSection>,

    #[serde(default)]
    pub variants: Vec<VariantSection>,

    #[serde(default)]
    pub depends_on: Vec<DependsOnSection>,

    #[serde(default)]
    pub conflicts: Vec<ConflictSection>,

    /// CMake definitions, emitted in this order
    #[serde(default)]
    pub cmake_args: Vec<CmakeArgSection>,

    /// Install steps for packages without a build system
    #[serde(default)]
    pub install: Vec<InstallSection>,
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    #[serde(default)]
    pub homepage: Option<String>,

    /// Default source archive URL
    ///
    /// May contain `%(version)s`; otherwise the version in the file name is
    /// replaced for each declared version.
    #[serde(default)]
    pub url: Option<String>,

    /// Git repository for commit-pinned versions
    #[serde(default)]
    pub git: Option<String>,

    /// Short description
    #[serde(default)]
    pub summary: Option<String>,

    /// Long description
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub build_system: BuildSystem,

    /// Interpreter package this one extends (e.g. "perl")
    #[serde(default)]
    pub extends: Option<String>,
}

/// A `[[versions]]` entry
///
/// Exactly one of `sha256`, `sha512` or `commit` must be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionSection {
    pub version: String,

    #[serde(default)]
    pub sha256: Option<String>,

    #[serde(default)]
    pub sha512: Option<String>,

    /// Git commit, for versions fetched from `package.git`
    #[serde(default)]
    pub commit: Option<String>,

    /// Override for the default URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Default value of a variant: `true`/`false` or a choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Choice(String),
}

/// A `[[variants]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSection {
    pub name: String,

    pub default: DefaultValue,

    /// Allowed values; required for choice variants
    #[serde(default)]
    pub values: Vec<String>,

    #[serde(default)]
    pub description: String,
}

/// Dependency types, as a list or a comma-separated string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeList {
    One(String),
    Many(Vec<String>),
}

impl TypeList {
    pub fn names(&self) -> Vec<String> {
        match self {
            TypeList::One(s) => s.split(',').map(|t| t.trim().to_string()).collect(),
            TypeList::Many(v) => v.clone(),
        }
    }
}

/// A `[[depends_on]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependsOnSection {
    /// Target spec, e.g. `python@3:` or `hdf5+mpi`
    pub spec: String,

    /// Defaults to `["build", "link"]`
    #[serde(default, rename = "type")]
    pub types: Option<TypeList>,

    /// Guard on this package's build; empty means always
    #[serde(default)]
    pub when: String,
}

/// A `[[conflicts]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictSection {
    /// Triggering condition, e.g. `+mpi`
    pub spec: String,

    #[serde(default)]
    pub when: String,

    #[serde(default)]
    pub msg: Option<String>,
}

/// A `[[cmake_args]]` entry
///
/// The value comes from exactly one of `from_variant`, `value` or
/// `dependency` (with `attribute`, default `prefix`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmakeArgSection {
    /// Cache variable name, without `-D`
    pub define: String,

    /// `BOOL`, `STRING`, `PATH` or `FILEPATH`; inferred when absent
    #[serde(default, rename = "type")]
    pub ty: Option<String>,

    #[serde(default)]
    pub from_variant: Option<String>,

    /// For boolean variants: `emit` (default) or `omit` the OFF case
    #[serde(default)]
    pub when_off: Option<OffPolicy>,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub dependency: Option<String>,

    #[serde(default)]
    pub attribute: Option<String>,

    #[serde(default)]
    pub when: String,
}

/// An `[[install]]` entry: one of `mkdirp`, `install` or `install_tree`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallSection {
    #[serde(default)]
    pub mkdirp: Option<String>,

    /// Glob relative to the source directory
    #[serde(default)]
    pub install: Option<String>,

    /// Directory relative to the source directory
    #[serde(default)]
    pub install_tree: Option<String>,

    /// Destination for `install` and `install_tree`
    #[serde(default)]
    pub to: Option<String>,
}
