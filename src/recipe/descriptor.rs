// src/recipe/descriptor.rs

//! The recipe descriptor and the resolved spec it produces
//!
//! A [`RecipeDescriptor`] is immutable once loaded. Every operation is a pure
//! function of a version and a [`VariantState`]; nothing is cached between
//! calls, so repeated calls with the same inputs give the same answers.

use crate::digest::Integrity;
use crate::error::{DeclarationError, Error, Result};
use crate::recipe::cmake::{cmake_define, CmakeArg, CmakeType};
use crate::recipe::conflict::ConflictRule;
use crate::recipe::dependency::DependencyEdge;
use crate::recipe::install::{InstallPlan, InstallStep};
use crate::recipe::installed::InstalledDependencies;
use crate::recipe::variant::{ResolvedVariants, Variant, VariantState, VariantValue};
use crate::version::Version;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;
use std::sync::LazyLock;
use strum_macros::{Display, EnumString};
use tracing::debug;

/// Name of the implicit variant every CMake recipe carries
pub const BUILD_TYPE_VARIANT: &str = "build_type";

/// Allowed values of the implicit build type variant
pub const BUILD_TYPES: &[&str] = &["Debug", "Release", "RelWithDebInfo", "MinSizeRel"];

/// Default CMake build type
pub const DEFAULT_BUILD_TYPE: &str = "RelWithDebInfo";

static VERSION_IN_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)+").unwrap());

/// How the package is configured and installed
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    /// Configured with CMake from `cmake_args`
    Cmake,
    /// Installed by explicit install steps
    #[default]
    Generic,
}

/// Package identity and source locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    pub name: String,
    pub homepage: Option<String>,
    /// Default archive URL; versions substitute their label into it
    pub url: Option<String>,
    /// Git repository for commit-pinned versions
    pub git: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub build_system: BuildSystem,
    /// Interpreter package this one installs into (e.g. `perl`)
    pub extends: Option<String>,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            homepage: None,
            url: None,
            git: None,
            summary: None,
            description: None,
            build_system: BuildSystem::default(),
            extends: None,
        }
    }
}

/// A known version of the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionEntry {
    #[serde(serialize_with = "serialize_display")]
    pub version: Version,
    pub integrity: Integrity,
    /// Override for the package's default URL
    pub url: Option<String>,
}

fn serialize_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl VersionEntry {
    /// Where to fetch this version from
    ///
    /// Commit-pinned versions come from the package's git repository. Archive
    /// versions use the override URL, else the default URL with this version
    /// substituted.
    pub fn source_url(&self, package: &PackageSpec) -> Result<String> {
        let missing = |what: &str| {
            Error::Declaration(DeclarationError::new(
                &package.name,
                format!("version {} has no {}", self.version, what),
            ))
        };

        match &self.integrity {
            Integrity::Git { .. } => package.git.clone().ok_or_else(|| missing("git URL")),
            Integrity::Archive { .. } => {
                if let Some(url) = &self.url {
                    return Ok(url.clone());
                }
                let default = package.url.as_deref().ok_or_else(|| missing("source URL"))?;
                substitute_version(default, self.version.as_str())
                    .ok_or_else(|| missing("substitutable source URL"))
            }
        }
    }
}

/// Put `version` into a default source URL
///
/// `%(version)s` placeholders are replaced. Without a placeholder, the first
/// dotted number in the URL's file name is taken to be the version.
pub fn substitute_version(url: &str, version: &str) -> Option<String> {
    if url.contains("%(version)s") {
        return Some(url.replace("%(version)s", version));
    }

    let file_start = url.rfind('/').map_or(0, |i| i + 1);
    let found = VERSION_IN_FILENAME.find(&url[file_start..])?;
    let start = file_start + found.start();
    let end = file_start + found.end();
    Some(format!("{}{}{}", &url[..start], version, &url[end..]))
}

/// Source location and integrity for one version, handed to the fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchTarget {
    pub name: String,
    pub version: String,
    pub url: String,
    pub integrity: Integrity,
}

impl std::fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.url, self.integrity)
    }
}

/// A loaded recipe
///
/// Built by the recipe parser, which checks every declaration; all lists keep
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeDescriptor {
    pub(crate) package: PackageSpec,
    pub(crate) versions: Vec<VersionEntry>,
    pub(crate) variants: Vec<Variant>,
    pub(crate) dependencies: Vec<DependencyEdge>,
    pub(crate) conflicts: Vec<ConflictRule>,
    pub(crate) cmake_args: Vec<CmakeArg>,
    pub(crate) install: Vec<InstallStep>,
}

impl RecipeDescriptor {
    pub fn name(&self) -> &str {
        &self.package.name
    }

    pub fn package(&self) -> &PackageSpec {
        &self.package
    }

    pub fn versions(&self) -> &[VersionEntry] {
        &self.versions
    }

    /// Declared variants with defaults and descriptions
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    pub fn conflicts(&self) -> &[ConflictRule] {
        &self.conflicts
    }

    pub fn cmake_args(&self) -> &[CmakeArg] {
        &self.cmake_args
    }

    pub fn install_steps(&self) -> &[InstallStep] {
        &self.install
    }

    pub fn has_variant(&self, name: &str) -> bool {
        self.variants.iter().any(|v| v.name == name)
    }

    /// Look up a declared version
    pub fn version(&self, version: &Version) -> Result<&VersionEntry> {
        self.versions
            .iter()
            .find(|e| &e.version == version)
            .ok_or_else(|| Error::UnknownVersion {
                package: self.package.name.clone(),
                version: version.to_string(),
            })
    }

    /// Highest release version, falling back to the first declared one
    pub fn preferred_version(&self) -> Option<&Version> {
        self.versions
            .iter()
            .map(|e| &e.version)
            .filter(|v| !v.is_branch())
            .max()
            .or_else(|| self.versions.first().map(|e| &e.version))
    }

    /// Archive URL and integrity for a declared version
    pub fn fetch_target(&self, version: &Version) -> Result<FetchTarget> {
        let entry = self.version(version)?;
        Ok(FetchTarget {
            name: self.package.name.clone(),
            version: entry.version.to_string(),
            url: entry.source_url(&self.package)?,
            integrity: entry.integrity.clone(),
        })
    }

    /// Give every declared variant a value
    pub fn resolve_variants(&self, state: &VariantState) -> Result<ResolvedVariants> {
        Variant::resolve(&self.package.name, &self.variants, state)
    }

    fn resolve_request(
        &self,
        version: &Version,
        state: &VariantState,
    ) -> Result<ResolvedVariants> {
        self.version(version)?;
        self.resolve_variants(state)
    }

    fn active_dependencies(
        &self,
        version: &Version,
        variants: &ResolvedVariants,
    ) -> Vec<DependencyEdge> {
        self.dependencies
            .iter()
            .filter(|edge| {
                let applies = edge.applies(version, variants);
                debug!(
                    "{}@{}: dependency {} {}",
                    self.package.name,
                    version,
                    edge,
                    if applies { "applies" } else { "skipped" }
                );
                applies
            })
            .cloned()
            .collect()
    }

    fn first_conflict(&self, version: &Version, variants: &ResolvedVariants) -> Result<()> {
        match self.conflicts.iter().find(|r| r.matches(version, variants)) {
            Some(rule) => Err(Error::Conflict(rule.to_error(&self.package.name))),
            None => Ok(()),
        }
    }

    fn render_arguments(
        &self,
        version: &Version,
        variants: &ResolvedVariants,
        installed: &dyn InstalledDependencies,
    ) -> Result<Vec<String>> {
        let mut args = Vec::new();
        for arg in &self.cmake_args {
            if let Some(token) = arg.render(version, variants, installed)? {
                args.push(token);
            }
        }
        Ok(args)
    }

    /// Dependency edges whose guards hold, in declaration order
    pub fn resolve_dependencies(
        &self,
        version: &Version,
        state: &VariantState,
    ) -> Result<Vec<DependencyEdge>> {
        let variants = self.resolve_request(version, state)?;
        Ok(self.active_dependencies(version, &variants))
    }

    /// Fail with the first matching conflict rule
    pub fn check_conflicts(&self, version: &Version, state: &VariantState) -> Result<()> {
        let variants = self.resolve_request(version, state)?;
        self.first_conflict(version, &variants)
    }

    /// Ordered `-D` tokens for the build
    ///
    /// Conflicts are checked first; a matching rule fails the call before any
    /// argument is rendered or any installed dependency is queried.
    pub fn build_arguments(
        &self,
        version: &Version,
        state: &VariantState,
        installed: &dyn InstalledDependencies,
    ) -> Result<Vec<String>> {
        let variants = self.resolve_request(version, state)?;
        self.first_conflict(version, &variants)?;
        self.render_arguments(version, &variants, installed)
    }

    /// Resolve everything needed for one build request
    pub fn resolve(
        &self,
        version: &Version,
        state: &VariantState,
        installed: &dyn InstalledDependencies,
    ) -> Result<ResolvedSpec> {
        let variants = self.resolve_request(version, state)?;
        self.first_conflict(version, &variants)?;
        let dependencies = self.active_dependencies(version, &variants);
        let arguments = self.render_arguments(version, &variants, installed)?;
        let source = self.fetch_target(version)?;

        Ok(ResolvedSpec {
            name: self.package.name.clone(),
            version: version.clone(),
            variants,
            dependencies,
            arguments,
            source,
            build_system: self.package.build_system,
            install: self.install.clone(),
        })
    }
}

/// One concrete build of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSpec {
    pub name: String,
    #[serde(serialize_with = "serialize_display")]
    pub version: Version,
    pub variants: ResolvedVariants,
    pub dependencies: Vec<DependencyEdge>,
    pub arguments: Vec<String>,
    pub source: FetchTarget,
    pub build_system: BuildSystem,
    #[serde(skip)]
    install: Vec<InstallStep>,
}

impl ResolvedSpec {
    /// `name@version+variants`
    pub fn spec_string(&self) -> String {
        let variants = self.variants.to_string();
        match variants.chars().next() {
            None => format!("{}@{}", self.name, self.version),
            Some('+') | Some('~') => format!("{}@{}{}", self.name, self.version, variants),
            Some(_) => format!("{}@{} {}", self.name, self.version, variants),
        }
    }

    /// Install prefix and build type definitions for CMake recipes
    pub fn std_cmake_args(&self, prefix: &Path) -> Vec<String> {
        if self.build_system != BuildSystem::Cmake {
            return Vec::new();
        }
        let build_type = match self.variants.get(BUILD_TYPE_VARIANT) {
            Some(VariantValue::Choice(value)) => value.as_str(),
            _ => DEFAULT_BUILD_TYPE,
        };
        vec![
            cmake_define(
                "CMAKE_INSTALL_PREFIX",
                CmakeType::String,
                &prefix.display().to_string(),
            ),
            cmake_define("CMAKE_BUILD_TYPE", CmakeType::String, build_type),
        ]
    }

    /// Full configure command: `cmake <source> <std args> <recipe args>`
    pub fn cmake_command_line(&self, source_dir: &Path, prefix: &Path) -> Vec<String> {
        let mut cmd = vec!["cmake".to_string(), source_dir.display().to_string()];
        cmd.extend(self.std_cmake_args(prefix));
        cmd.extend(self.arguments.iter().cloned());
        cmd
    }

    /// Install steps rendered against `prefix`
    pub fn install_plan(&self, prefix: &Path) -> InstallPlan {
        InstallPlan::new(prefix, &self.install)
    }
}
