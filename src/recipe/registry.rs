// src/recipe/registry.rs

//! Recipe registry
//!
//! Recipes are registered once, through [`RegistryBuilder`], and the resulting
//! [`RecipeRegistry`] is immutable. Descriptors are handed out behind `Arc` so
//! independent build requests can share them.

use crate::error::{DeclarationError, Error, Result};
use crate::recipe::descriptor::{FetchTarget, RecipeDescriptor};
use crate::recipe::parser::{parse_recipe, parse_recipe_file};
use crate::version::Version;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Recipes compiled into the binary
pub const BUILTIN_RECIPES: &[(&str, &str)] = &[
    ("dakota", include_str!("../../recipes/dakota.toml")),
    (
        "perl-star-fusion",
        include_str!("../../recipes/perl-star-fusion.toml"),
    ),
];

/// Collects recipes before the registry is frozen
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    recipes: BTreeMap<String, (Arc<RecipeDescriptor>, String)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compiled recipe; `origin` names where it came from
    pub fn add(&mut self, recipe: RecipeDescriptor, origin: &str) -> Result<()> {
        let name = recipe.name().to_string();
        if let Some((_, existing)) = self.recipes.get(&name) {
            return Err(DeclarationError::new(
                &name,
                format!("registered twice ({} and {})", existing, origin),
            )
            .into());
        }
        debug!("registered recipe {} from {}", name, origin);
        self.recipes
            .insert(name, (Arc::new(recipe), origin.to_string()));
        Ok(())
    }

    /// Register the recipes embedded in the binary
    pub fn with_builtin(mut self) -> Result<Self> {
        for (name, content) in BUILTIN_RECIPES {
            let recipe = parse_recipe(content)?;
            self.add(recipe, &format!("builtin:{}", name))?;
        }
        Ok(self)
    }

    /// Register every `*.toml` recipe under `dir`, in path order
    ///
    /// A missing directory is skipped with a warning; a malformed recipe
    /// fails the whole load.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            warn!("recipe directory {} does not exist, skipping", dir.display());
            return Ok(0);
        }

        let mut loaded = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }
            let recipe = parse_recipe_file(path)?;
            self.add(recipe, &path.display().to_string())?;
            loaded += 1;
        }
        info!("loaded {} recipes from {}", loaded, dir.display());
        Ok(loaded)
    }

    pub fn build(self) -> RecipeRegistry {
        RecipeRegistry {
            recipes: self
                .recipes
                .into_iter()
                .map(|(name, (recipe, _))| (name, recipe))
                .collect(),
        }
    }
}

/// Immutable name → recipe map
#[derive(Debug, Clone, Default)]
pub struct RecipeRegistry {
    recipes: BTreeMap<String, Arc<RecipeDescriptor>>,
}

impl RecipeRegistry {
    /// Registry holding only the builtin recipes
    pub fn builtin() -> Result<Self> {
        Ok(RegistryBuilder::new().with_builtin()?.build())
    }

    pub fn get(&self, name: &str) -> Result<Arc<RecipeDescriptor>> {
        self.recipes
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownPackage(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    /// Recipe names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeDescriptor> {
        self.recipes.values().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Archive URL and integrity for `name@version`
    pub fn fetch_target(&self, name: &str, version: &Version) -> Result<FetchTarget> {
        self.get(name)?.fetch_target(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EXTRA: &str = r#"
[package]
name = "zlib"
url = "https://zlib.net/zlib-1.3.tar.gz"

[[versions]]
version = "1.3"
sha256 = "ff0ba4c292013dbc27530b3a81e1f9a813cd39de01ca5e0f8bf355702efa593e"
"#;

    #[test]
    fn test_builtin_registry() {
        let registry = RecipeRegistry::builtin().unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["dakota", "perl-star-fusion"]);
        assert!(matches!(
            registry.get("nonexistent"),
            Err(Error::UnknownPackage(_))
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut builder = RegistryBuilder::new().with_builtin().unwrap();
        let again = parse_recipe(BUILTIN_RECIPES[0].1).unwrap();
        let err = builder.add(again, "test").unwrap_err();
        assert!(matches!(err, Error::Declaration(_)));
    }

    #[test]
    fn test_load_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("libs")).unwrap();
        fs::write(dir.path().join("libs/zlib.toml"), EXTRA).unwrap();
        fs::write(dir.path().join("README.md"), "not a recipe").unwrap();

        let mut builder = RegistryBuilder::new();
        assert_eq!(builder.load_dir(dir.path()).unwrap(), 1);
        let registry = builder.build();
        assert!(registry.contains("zlib"));

        let target = registry
            .fetch_target("zlib", &Version::parse("1.3").unwrap())
            .unwrap();
        assert_eq!(target.url, "https://zlib.net/zlib-1.3.tar.gz");
    }

    #[test]
    fn test_load_missing_dir_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut builder = RegistryBuilder::new();
        assert_eq!(builder.load_dir(&dir.path().join("absent")).unwrap(), 0);
    }

    #[test]
    fn test_load_dir_rejects_bad_recipe() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.toml"), "[package]\nname = \"x\"\n").unwrap();
        let mut builder = RegistryBuilder::new();
        assert!(matches!(
            builder.load_dir(dir.path()),
            Err(Error::Declaration(_))
        ));
    }
}
