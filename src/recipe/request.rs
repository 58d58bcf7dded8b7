// src/recipe/request.rs

//! Build requests: `dakota@6.13 +mpi ~hdf5`

use crate::error::{Error, Result};
use crate::recipe::descriptor::{RecipeDescriptor, ResolvedSpec};
use crate::recipe::installed::InstalledDependencies;
use crate::recipe::registry::RecipeRegistry;
use crate::recipe::syntax::split_name;
use crate::recipe::variant::VariantState;
use crate::version::Version;
use std::fmt;
use std::str::FromStr;

/// A package name with an optional exact version and variant choices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub name: String,
    /// `None` means the recipe's preferred version
    pub version: Option<Version>,
    pub variants: VariantState,
}

impl BuildRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            variants: VariantState::new(),
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_variants(mut self, variants: VariantState) -> Self {
        self.variants = variants;
        self
    }

    /// Parse `name[@version] [variants...]`
    ///
    /// The version, if any, must directly follow the name and be a single
    /// label; ranges are for recipes, not requests.
    pub fn parse(input: &str) -> Result<Self> {
        let (name, rest) = split_name(input)?;
        let mut request = Self::new(name);

        let rest = match rest.trim_start().strip_prefix('@') {
            Some(body) => {
                let body = body.trim_start();
                let end = body.find(['+', '~', ' ', '\t']).unwrap_or(body.len());
                let label = &body[..end];
                if label.contains([':', ',']) {
                    return Err(Error::ParseError(format!(
                        "'{}' needs an exact version, not a range",
                        input
                    )));
                }
                request.version = Some(Version::parse(label)?);
                &body[end..]
            }
            None => rest,
        };

        request.variants = VariantState::parse(rest)?;
        Ok(request)
    }

    /// The requested version, else the recipe's preferred one
    pub fn version_for(&self, recipe: &RecipeDescriptor) -> Result<Version> {
        match &self.version {
            Some(version) => Ok(version.clone()),
            None => recipe
                .preferred_version()
                .cloned()
                .ok_or_else(|| Error::UnknownVersion {
                    package: recipe.name().to_string(),
                    version: "(none declared)".to_string(),
                }),
        }
    }
}

impl fmt::Display for BuildRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{}", version)?;
        }
        if !self.variants.is_empty() {
            write!(f, " {}", self.variants)?;
        }
        Ok(())
    }
}

impl FromStr for BuildRequest {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BuildRequest::parse(s)
    }
}

impl RecipeRegistry {
    /// Resolve a build request against the registered recipes
    pub fn resolve(
        &self,
        request: &BuildRequest,
        installed: &dyn InstalledDependencies,
    ) -> Result<ResolvedSpec> {
        let recipe = self.get(&request.name)?;
        let version = request.version_for(&recipe)?;
        recipe.resolve(&version, &request.variants, installed)
    }
}
